//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cellrun")]
#[command(about = "Run declarative matrix pipelines across environment cells")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run the workflow across all matrix cells")]
    Run {
        #[arg(
            long,
            short = 'f',
            help = "Path to the workflow file",
            default_value = "cellrun.yml"
        )]
        file: PathBuf,

        #[arg(long, help = "Force the trigger event instead of detecting it", value_enum)]
        event: Option<EventKind>,

        #[arg(long, help = "Branch for a forced push event")]
        branch: Option<String>,

        #[arg(long, help = "Target branch for a forced pull-request event")]
        base_branch: Option<String>,

        #[arg(long, help = "Report steps without executing them")]
        dry_run: bool,

        #[arg(long, help = "Stop scheduling cells after the first failure")]
        fail_fast: bool,

        #[arg(long, help = "Write the run report as JSON to this path")]
        report_json: Option<PathBuf>,

        #[arg(long, help = "Stream step output instead of capturing it")]
        no_capture: bool,
    },
    #[command(about = "List the materialized environment cells")]
    Cells {
        #[arg(
            long,
            short = 'f',
            help = "Path to the workflow file",
            default_value = "cellrun.yml"
        )]
        file: PathBuf,
    },
    #[command(about = "Parse and validate a workflow file")]
    Validate {
        #[arg(
            long,
            short = 'f',
            help = "Path to the workflow file",
            default_value = "cellrun.yml"
        )]
        file: PathBuf,
    },
}

/// Forced trigger event kinds.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventKind {
    /// A push to a branch
    Push,
    /// A pull request targeting a branch
    PullRequest,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["cellrun", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                file,
                event,
                dry_run,
                fail_fast,
                no_capture,
                ..
            } => {
                assert_eq!(file, PathBuf::from("cellrun.yml"));
                assert!(event.is_none());
                assert!(!dry_run);
                assert!(!fail_fast);
                assert!(!no_capture);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_with_forced_event() {
        let cli = Cli::try_parse_from([
            "cellrun",
            "run",
            "--file",
            "demos/neuroci.yml",
            "--event",
            "pull-request",
            "--base-branch",
            "master",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                file,
                event,
                base_branch,
                ..
            } => {
                assert_eq!(file, PathBuf::from("demos/neuroci.yml"));
                assert!(matches!(event, Some(EventKind::PullRequest)));
                assert_eq!(base_branch.as_deref(), Some("master"));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_global_level_flag() {
        let cli = Cli::try_parse_from(["cellrun", "cells", "--level", "debug"]).unwrap();
        assert!(matches!(cli.level, crate::tracing::LogLevel::Debug));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::try_parse_from(["cellrun", "validate", "-f", "wf.yml"]).unwrap();
        match cli.command {
            Commands::Validate { file } => assert_eq!(file, PathBuf::from("wf.yml")),
            _ => panic!("expected validate command"),
        }
    }
}
