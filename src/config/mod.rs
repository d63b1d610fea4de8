//! Configuration loading
//!
//! Three YAML documents drive a run:
//! - `config.yaml`: named paths, target column, CSV separator ([`AppConfig`])
//! - `params.yaml`: split, scaler and model choice ([`Params`])
//! - `schema.yaml`: required columns ([`Schema`])
//!
//! All three are read fresh on every invocation and never mutated afterwards.

mod params;
mod schema;

pub use params::{ModelParams, Params, PreprocessingParams, SplitParams};
pub use schema::Schema;

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Named filesystem locations. Always absolute once loaded through [`AppConfig::load`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Raw delimited data file
    pub data_raw: PathBuf,
    /// Directory for split CSVs and the fitted scaler
    pub data_processed_dir: PathBuf,
    /// Directory for the model and its feature list
    pub model_dir: PathBuf,
    /// Directory for metrics, charts and the report
    pub reports_dir: PathBuf,
    /// Schema document
    #[serde(default)]
    pub schema_file: Option<PathBuf>,
}

/// Feature metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Name of the regression target column
    pub target: String,
}

/// Delimited-file options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    #[serde(default = "default_csv_sep")]
    pub csv_sep: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            csv_sep: default_csv_sep(),
        }
    }
}

fn default_csv_sep() -> String {
    ",".to_string()
}

/// Thresholds for the raw data contract check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_target_min")]
    pub target_min: f64,
    #[serde(default = "default_target_max")]
    pub target_max: f64,
    #[serde(default = "default_max_duplicate_fraction")]
    pub max_duplicate_fraction: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            target_min: default_target_min(),
            target_max: default_target_max(),
            max_duplicate_fraction: default_max_duplicate_fraction(),
        }
    }
}

fn default_target_min() -> f64 {
    0.0
}

fn default_target_max() -> f64 {
    10.0
}

fn default_max_duplicate_fraction() -> f64 {
    0.2
}

/// Process-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub features: FeaturesConfig,
    #[serde(default)]
    pub io: IoConfig,
    #[serde(default)]
    pub quality: QualityConfig,
    /// Absolute location of the file this configuration was read from
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl AppConfig {
    /// Load a configuration file and normalise every `paths.*` entry against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config_path = absolutize(path.as_ref())?;
        if !config_path.exists() {
            return Err(PipelineError::MissingInput(config_path));
        }

        let text = std::fs::read_to_string(&config_path)?;
        let mut config: AppConfig = serde_yaml::from_str(&text)?;

        let base = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        config.paths.data_raw = resolve(&base, &config.paths.data_raw);
        config.paths.data_processed_dir = resolve(&base, &config.paths.data_processed_dir);
        config.paths.model_dir = resolve(&base, &config.paths.model_dir);
        config.paths.reports_dir = resolve(&base, &config.paths.reports_dir);
        config.paths.schema_file = config.paths.schema_file.as_ref().map(|p| resolve(&base, p));
        config.config_path = config_path;

        config.validate()?;
        debug!(config = %config.config_path.display(), "Configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.io.csv_sep.len() != 1 {
            return Err(PipelineError::Config(format!(
                "io.csv_sep must be a single byte, got {:?}",
                self.io.csv_sep
            )));
        }
        if self.features.target.trim().is_empty() {
            return Err(PipelineError::Config("features.target must not be empty".to_string()));
        }
        Ok(())
    }

    /// Field separator of the raw data file
    pub fn separator(&self) -> u8 {
        self.io.csv_sep.as_bytes().first().copied().unwrap_or(b',')
    }

    /// Schema location: `paths.schema_file`, else `schema.yaml` in the working directory
    pub fn schema_path(&self) -> PathBuf {
        match &self.paths.schema_file {
            Some(p) => p.clone(),
            None => PathBuf::from("schema.yaml"),
        }
    }

    /// Create the processed, model and reports directories
    pub fn make_dirs(&self) -> Result<()> {
        for dir in [
            &self.paths.data_processed_dir,
            &self.paths.model_dir,
            &self.paths.reports_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn features_path(&self) -> PathBuf {
        self.paths.model_dir.join("features.json")
    }

    pub fn model_path(&self) -> PathBuf {
        self.paths.model_dir.join("model.json")
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.paths.data_processed_dir.join("scaler.json")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.paths.reports_dir.join("metrics.json")
    }

    /// Location of one of the four split files (`X_train`, `X_test`, `y_train`, `y_test`)
    pub fn split_path(&self, stem: &str) -> PathBuf {
        self.paths.data_processed_dir.join(format!("{stem}.csv"))
    }
}

/// Read and deserialize a YAML document, failing with `MissingInput` when absent
pub(crate) fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let path = absolutize(path)?;
    if !path.exists() {
        return Err(PipelineError::MissingInput(path));
    }
    let text = std::fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&text)?)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    // canonicalize only works for existing paths; artifact dirs may not exist yet
    joined.canonicalize().unwrap_or_else(|_| normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_relative_paths_resolved_against_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let conf_dir = tmp.path().join("config");
        std::fs::create_dir_all(&conf_dir).unwrap();
        let path = write_config(
            &conf_dir,
            "paths:\n  data_raw: ../data/raw.csv\n  data_processed_dir: ../data/processed\n  model_dir: ../models\n  reports_dir: ../reports\n  schema_file: schema.yaml\nfeatures:\n  target: quality\nio:\n  csv_sep: \";\"\n",
        );

        let config = AppConfig::load(&path).unwrap();
        let root = tmp.path().to_path_buf();

        assert!(config.paths.data_raw.is_absolute());
        assert_eq!(config.paths.data_raw, root.join("data/raw.csv"));
        assert_eq!(config.paths.model_dir, root.join("models"));
        assert_eq!(config.schema_path(), root.join("config/schema.yaml"));
        assert_eq!(config.separator(), b';');
    }

    #[test]
    fn test_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            tmp.path(),
            "paths:\n  data_raw: raw.csv\n  data_processed_dir: processed\n  model_dir: models\n  reports_dir: reports\nfeatures:\n  target: y\n",
        );

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.separator(), b',');
        assert_eq!(config.schema_path(), PathBuf::from("schema.yaml"));
        assert_eq!(config.quality.target_max, 10.0);
    }

    #[test]
    fn test_multi_byte_separator_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            tmp.path(),
            "paths:\n  data_raw: raw.csv\n  data_processed_dir: p\n  model_dir: m\n  reports_dir: r\nfeatures:\n  target: y\nio:\n  csv_sep: \";;\"\n",
        );

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = AppConfig::load("/definitely/not/here/config.yaml").unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }

    #[test]
    fn test_normalize_strips_parent_components() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
    }
}
