//! Raw data contract: target range and duplicate rows.
//!
//! A lightweight gate run before training on a fresh data drop. It never
//! modifies the data; it only reports violations.

use crate::config::QualityConfig;
use crate::error::Result;
use crate::utils::frame::{column_names, lenient_numeric_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One broken expectation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContractViolation {
    /// Target values outside the accepted inclusive range (non-numeric values count too)
    TargetOutOfRange { column: String, count: usize, min: f64, max: f64 },
    /// Too many exact duplicate rows
    DuplicateRows { count: usize, total: usize, max_fraction: f64 },
}

impl std::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractViolation::TargetOutOfRange { column, count, min, max } => write!(
                f,
                "{count} value(s) of '{column}' outside [{min}, {max}]"
            ),
            ContractViolation::DuplicateRows { count, total, max_fraction } => write!(
                f,
                "{count} duplicate row(s) out of {total} (limit {:.0}%)",
                max_fraction * 100.0
            ),
        }
    }
}

/// Result of a contract check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractReport {
    pub rows: usize,
    pub duplicate_rows: usize,
    pub violations: Vec<ContractViolation>,
}

impl ContractReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks a raw dataset against the configured thresholds
#[derive(Debug, Clone)]
pub struct DataContract {
    target: String,
    config: QualityConfig,
}

impl DataContract {
    pub fn new(target: &str, config: QualityConfig) -> Self {
        Self {
            target: target.to_string(),
            config,
        }
    }

    pub fn check(&self, df: &DataFrame) -> Result<ContractReport> {
        let mut violations = Vec::new();

        let target = lenient_numeric_column(df, &self.target)?;
        let out_of_range = target
            .iter()
            .filter(|v| match v {
                Some(v) => *v < self.config.target_min || *v > self.config.target_max,
                None => true,
            })
            .count();
        if out_of_range > 0 {
            violations.push(ContractViolation::TargetOutOfRange {
                column: self.target.clone(),
                count: out_of_range,
                min: self.config.target_min,
                max: self.config.target_max,
            });
        }

        let duplicate_rows = count_duplicate_rows(df)?;
        let rows = df.height();
        if rows > 0 && duplicate_rows as f64 > rows as f64 * self.config.max_duplicate_fraction {
            violations.push(ContractViolation::DuplicateRows {
                count: duplicate_rows,
                total: rows,
                max_fraction: self.config.max_duplicate_fraction,
            });
        }

        Ok(ContractReport {
            rows,
            duplicate_rows,
            violations,
        })
    }
}

/// Rows identical to an earlier row, compared on their string rendering
fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
    let names = column_names(df);
    let columns: Vec<Series> = names
        .iter()
        .map(|name| Ok(df.column(name)?.as_materialized_series().cast(&DataType::String)?))
        .collect::<Result<Vec<_>>>()?;
    let texts: Vec<&StringChunked> = columns
        .iter()
        .map(|s| s.str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(df.height());
    let mut duplicates = 0;
    for row in 0..df.height() {
        let key: Vec<Option<&str>> = texts.iter().map(|ca| ca.get(row)).collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    Ok(duplicates)
}
