//! Matrix axes and environment cells.
//!
//! A matrix declares named axes, each with a list of values. Expanding the
//! matrix yields one [`Cell`] per entry of the cross product, minus any
//! combinations matched by an exclusion entry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared matrix: ordered axes plus optional exclusions.
///
/// Axis order is the declaration order of the workflow file; it determines
/// both the expansion order of cells and the order of `axis=value` pairs in
/// cell labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    /// Axis name to declared values.
    pub axes: IndexMap<String, Vec<String>>,
    /// Partial assignments to drop from the cross product.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<IndexMap<String, String>>,
}

impl Matrix {
    /// Expand the cross product of all axis values into cells.
    ///
    /// Every combination appears exactly once. Axes vary slowest-first in
    /// declaration order, so the first axis's first value leads the list.
    /// Combinations matched by an exclusion entry are dropped.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![IndexMap::new()];

        for (axis, values) in &self.axes {
            let mut next = Vec::with_capacity(cells.len() * values.len());
            for partial in &cells {
                for value in values {
                    let mut assignment = partial.clone();
                    assignment.insert(axis.clone(), value.clone());
                    next.push(assignment);
                }
            }
            cells = next;
        }

        cells
            .into_iter()
            .map(|values| Cell { values })
            .filter(|cell| !self.is_excluded(cell))
            .collect()
    }

    fn is_excluded(&self, cell: &Cell) -> bool {
        self.exclude.iter().any(|entry| {
            entry
                .iter()
                .all(|(axis, value)| cell.get(axis) == Some(value.as_str()))
        })
    }
}

/// One concrete assignment of every matrix axis.
///
/// Cells are immutable once materialized; they exist for the duration of a
/// run and carry no execution state of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cell {
    values: IndexMap<String, String>,
}

impl Cell {
    /// Build a cell from explicit axis assignments. Primarily for tests and
    /// ad-hoc construction; runs obtain cells from [`Matrix::cells`].
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up the value assigned to an axis.
    #[must_use]
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.values.get(axis).map(String::as_str)
    }

    /// Iterate `(axis, value)` pairs in axis declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Display label: `axis=value` pairs joined in axis order.
    #[must_use]
    pub fn label(&self) -> String {
        self.values
            .iter()
            .map(|(axis, value)| format!("{axis}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
