//! Delimited text tables with trimmed headers and lenient numeric access

use crate::io::error::{PipelineError, Result, WithPath};
use bitvec::slice::BitSlice;
use std::path::Path;

/// Cell texts treated as missing when a column is read numerically
const MISSING_MARKERS: [&str; 5] = ["", "na", "nan", "null", "none"];

/// Parse a cell as a number, mapping missing markers and garbage to `None`
pub fn parse_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if MISSING_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render an optional number; missing values become empty cells
pub fn format_numeric(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Render an optional count; missing values become empty cells
pub fn format_count(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// In-memory delimited table; every transformation returns a new value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    /// Build a table, trimming whitespace from every header
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    /// Read a comma-separated table with a header row
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Table`] if the file cannot be opened or parsed
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(path)
            .with_path(path, "open table")?;

        let headers = reader
            .headers()
            .with_path(path, "read header")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.with_path(path, "read record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(headers, rows))
    }

    /// Write the table as comma-separated text, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file written
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
        }

        let mut writer = csv::Writer::from_path(path).with_path(path, "create table")?;
        writer
            .write_record(&self.headers)
            .with_path(path, "write header")?;
        for row in &self.rows {
            writer.write_record(row).with_path(path, "write record")?;
        }
        writer.flush().with_path(path, "flush table")
    }

    /// Trimmed column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw cell texts, one vector per row
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact (trimmed) name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers.iter().position(|h| h == wanted)
    }

    /// Position of a column that must exist
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SchemaMismatch`] naming `path` if the column is absent
    pub fn require_column(&self, name: &str, path: &Path) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::SchemaMismatch {
                path: path.to_path_buf(),
                column: name.trim().to_string(),
                available: self.headers.clone(),
            })
    }

    /// Cell texts of one column, empty for short rows
    pub fn text_column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map_or("", String::as_str))
                .collect(),
        )
    }

    /// Numeric view of one column with missing and malformed cells as `None`
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.text_column(name)
            .map(|cells| cells.into_iter().map(parse_numeric).collect())
    }

    /// New table with `columns` appended (or replaced, when a name already exists)
    pub fn with_columns(&self, columns: Vec<(String, Vec<String>)>) -> Self {
        let mut headers = self.headers.clone();
        let mut rows = self.rows.clone();
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }

        for (name, values) in columns {
            let target = headers.iter().position(|h| *h == name);
            let index = target.unwrap_or_else(|| {
                headers.push(name.clone());
                for row in &mut rows {
                    row.push(String::new());
                }
                headers.len() - 1
            });
            for (row, value) in rows.iter_mut().zip(values) {
                if let Some(cell) = row.get_mut(index) {
                    *cell = value;
                }
            }
        }

        Self { headers, rows }
    }

    /// New table keeping rows whose mask bit is set, in original order
    pub fn select_rows(&self, mask: &BitSlice) -> Self {
        let rows = self
            .rows
            .iter()
            .zip(mask.iter().by_vals())
            .filter_map(|(row, keep)| keep.then(|| row.clone()))
            .collect();
        Self {
            headers: self.headers.clone(),
            rows,
        }
    }
}
