//! Required-column presence check

use crate::config::{AppConfig, Schema};
use crate::error::{PipelineError, Result};
use crate::utils::frame::column_names;
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::info;

/// Asserts that `schema.required ∪ {target}` is a subset of the dataset columns
#[derive(Debug, Clone)]
pub struct DataValidation {
    target: String,
    required: BTreeSet<String>,
}

impl DataValidation {
    pub fn new(schema: &Schema, config: &AppConfig) -> Self {
        let target = schema
            .target
            .clone()
            .unwrap_or_else(|| config.features.target.clone());
        let mut required: BTreeSet<String> = schema.required.iter().cloned().collect();
        required.insert(target.clone());
        Self { target, required }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Fails with a schema violation listing every missing column, sorted
    pub fn check_required(&self, df: &DataFrame) -> Result<()> {
        let present: BTreeSet<String> = column_names(df).into_iter().collect();
        let missing: Vec<String> = self.required.difference(&present).cloned().collect();

        if !missing.is_empty() {
            return Err(PipelineError::schema(
                format!("Missing required columns: {missing:?}"),
                missing,
            ));
        }

        info!(required = self.required.len(), "Required columns present");
        Ok(())
    }
}
