//! Delimited file loading and saving

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// CSV reader with a configurable separator
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Field separator
    separator: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a comma-separated loader
    pub fn new() -> Self {
        Self { separator: b',' }
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Load a CSV file with a header row. Column types are inferred from every
    /// row, so a late decimal or non-numeric cell widens the column instead of
    /// failing the read.
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame> {
        if !path.exists() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }

        let parse_opts = CsvParseOptions::default().with_separator(self.separator);

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| PipelineError::Data(format!("{}: {}", path.display(), e)))
    }
}

/// CSV writer for split artifacts
pub struct DataSaver;

impl DataSaver {
    /// Save to comma-separated CSV with a header, overwriting any existing file
    pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| PipelineError::Data(format!("{}: {}", path.display(), e)))
    }
}
