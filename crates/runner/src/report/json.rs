use super::RunReport;
use cellrun_core::Result;

/// Writes the run report to a JSON file
///
/// # Errors
/// Returns error if file creation or JSON serialization fails
pub fn write_report(report: &RunReport, path: &std::path::Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
