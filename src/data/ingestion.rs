//! Raw data ingestion

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::utils::DataLoader;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Reads the configured raw data file into a DataFrame
#[derive(Debug, Clone)]
pub struct DataIngestion {
    raw: PathBuf,
    separator: u8,
}

impl DataIngestion {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            raw: config.paths.data_raw.clone(),
            separator: config.separator(),
        }
    }

    /// Load the raw dataset. No type checking happens here.
    pub fn load(&self) -> Result<DataFrame> {
        if !self.raw.exists() {
            return Err(PipelineError::MissingInput(self.raw.clone()));
        }

        let df = DataLoader::new()
            .with_separator(self.separator)
            .load_csv(&self.raw)?;

        info!(
            path = %self.raw.display(),
            rows = df.height(),
            columns = df.width(),
            "Raw data loaded"
        );
        Ok(df)
    }
}
