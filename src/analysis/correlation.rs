//! Pairwise Spearman correlation over the numeric columns of a table
//!
//! Each pair uses its own complete cases, so columns with different gaps
//! still contribute wherever both sides are present. No multiple-comparison
//! correction is applied; callers that test many pairs must adjust p-values.

use crate::analysis::aggregate::MergedRow;
use crate::io::configuration::MIN_CORRELATION_OBSERVATIONS;
use crate::io::table::{DelimitedTable, format_numeric};
use crate::math::probability::correlation_p_value;
use crate::math::ranking::spearman;

/// Declared type of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Participates in correlation
    Numeric,
    /// Identifier or label column
    Text,
}

/// A named column of optional values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type
    pub kind: ColumnKind,
    /// One value per row; `None` is a missing cell
    pub values: Vec<Option<f64>>,
}

/// Rank correlation between two columns
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPair {
    /// First column (earlier in table order)
    pub var1: String,
    /// Second column
    pub var2: String,
    /// Pairwise-complete observations used
    pub n: usize,
    /// Spearman's rho; `None` when a side is constant
    pub spearman_r: Option<f64>,
    /// Two-sided p-value; `None` when rho is undefined
    pub p_value: Option<f64>,
}

impl CorrelationPair {
    /// Column order of the correlation table
    pub const HEADERS: [&'static str; 5] = ["var1", "var2", "n", "spearman_r", "p_value"];

    /// Cell texts in [`Self::HEADERS`] order
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.var1.clone(),
            self.var2.clone(),
            self.n.to_string(),
            format_numeric(self.spearman_r),
            format_numeric(self.p_value),
        ]
    }

    /// Table of pairs in the given order
    pub fn to_table(pairs: &[Self]) -> DelimitedTable {
        DelimitedTable::new(
            Self::HEADERS.iter().map(|h| (*h).to_string()).collect(),
            pairs.iter().map(Self::to_record).collect(),
        )
    }
}

/// Columns of the merged table with their declared kinds
pub fn merged_columns(rows: &[MergedRow]) -> Vec<Column> {
    let values: Vec<[Option<f64>; 9]> = rows.iter().map(MergedRow::numeric_values).collect();

    let mut columns = vec![Column {
        name: MergedRow::HEADERS[0].to_string(),
        kind: ColumnKind::Text,
        values: vec![None; rows.len()],
    }];
    for (offset, name) in MergedRow::HEADERS.iter().skip(1).enumerate() {
        columns.push(Column {
            name: (*name).to_string(),
            kind: ColumnKind::Numeric,
            values: values
                .iter()
                .map(|row| row.get(offset).copied().flatten())
                .collect(),
        });
    }
    columns
}

/// Correlation of one column pair, `None` below the observation minimum
pub fn correlate_pair(first: &Column, second: &Column) -> Option<CorrelationPair> {
    let (x, y): (Vec<f64>, Vec<f64>) = first
        .values
        .iter()
        .zip(&second.values)
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .unzip();

    let n = x.len();
    if n < MIN_CORRELATION_OBSERVATIONS {
        return None;
    }

    let spearman_r = spearman(&x, &y);
    let p_value = spearman_r.and_then(|r| correlation_p_value(r, n));
    Some(CorrelationPair {
        var1: first.name.clone(),
        var2: second.name.clone(),
        n,
        spearman_r,
        p_value,
    })
}

/// Every unordered pair of numeric columns, in table order
pub fn correlate(columns: &[Column]) -> Vec<CorrelationPair> {
    let numeric: Vec<&Column> = columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .collect();

    let mut pairs = Vec::new();
    for (i, first) in numeric.iter().enumerate() {
        for second in numeric.iter().skip(i + 1) {
            if let Some(pair) = correlate_pair(first, second) {
                pairs.push(pair);
            }
        }
    }
    pairs
}
