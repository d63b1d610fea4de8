//! Utility functions and types

pub mod data_loader;
pub mod frame;

pub use data_loader::{DataLoader, DataSaver};

use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// Serialize a value as pretty JSON, overwriting the target file
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a JSON artifact, failing with `MissingInput` when the file is absent
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(crate::error::PipelineError::MissingInput(path.to_path_buf()));
    }
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
