//! Physical-plausibility pre-filter applied before outlier classification

use crate::io::configuration::{DEFAULT_FILTER_FLOOR, DEFAULT_SIGMA_COLUMN};
use crate::io::error::Result;
use crate::io::table::DelimitedTable;
use bitvec::prelude::BitVec;
use std::path::Path;

/// Keep rows whose `column` value is strictly greater than `floor`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Discriminant column, typically the fitted sigma in nanometres
    pub column: String,
    /// Exclusive lower bound
    pub floor: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_SIGMA_COLUMN.to_string(),
            floor: DEFAULT_FILTER_FLOOR,
        }
    }
}

impl FilterConfig {
    /// Whether a single value passes; missing values never do
    pub fn passes(&self, value: Option<f64>) -> bool {
        value.is_some_and(|v| v > self.floor)
    }

    /// Pass mask over a column of optional values
    pub fn mask(&self, values: &[Option<f64>]) -> BitVec {
        values.iter().map(|&v| self.passes(v)).collect()
    }

    /// New table holding only the rows that pass
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::SchemaMismatch`] if the discriminant
    /// column is absent from `table` (read from `path`)
    pub fn apply(&self, table: &DelimitedTable, path: &Path) -> Result<DelimitedTable> {
        table.require_column(&self.column, path)?;
        let values = table.numeric_column(&self.column).unwrap_or_default();
        Ok(table.select_rows(&self.mask(&values)))
    }
}
