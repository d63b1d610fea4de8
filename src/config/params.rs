//! Run parameters (`params.yaml`)

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Train/test split settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitParams {
    /// Fraction of rows held out for testing
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    /// Permute rows before splitting
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            shuffle: default_shuffle(),
        }
    }
}

fn default_test_size() -> f64 {
    0.2
}

fn default_shuffle() -> bool {
    true
}

/// Preprocessing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingParams {
    /// One of `none`, `standard`, `minmax`
    #[serde(default = "default_scaler")]
    pub scaler: String,
}

impl Default for PreprocessingParams {
    fn default() -> Self {
        Self {
            scaler: default_scaler(),
        }
    }
}

fn default_scaler() -> String {
    "none".to_string()
}

/// Model choice and hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// `linear` or anything else for the random forest
    #[serde(rename = "type", default = "default_model_type")]
    pub model_type: String,
    /// Number of trees
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    /// Maximum tree depth (None = unbounded)
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Worker threads for tree building (-1 or absent = all cores)
    #[serde(default = "default_n_jobs")]
    pub n_jobs: i64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model_type: default_model_type(),
            n_estimators: default_n_estimators(),
            max_depth: None,
            n_jobs: default_n_jobs(),
        }
    }
}

fn default_model_type() -> String {
    "random_forest".to_string()
}

fn default_n_estimators() -> usize {
    200
}

fn default_n_jobs() -> i64 {
    -1
}

/// All run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub split: SplitParams,
    #[serde(default)]
    pub preprocessing: PreprocessingParams,
    #[serde(default)]
    pub model: ModelParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            split: SplitParams::default(),
            preprocessing: PreprocessingParams::default(),
            model: ModelParams::default(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

impl Params {
    /// Load `params.yaml`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let params: Params = super::read_yaml(path.as_ref())?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        let t = self.split.test_size;
        if !(t > 0.0 && t < 1.0) {
            return Err(PipelineError::Config(format!(
                "split.test_size must be in (0, 1), got {t}"
            )));
        }
        if self.model.n_estimators == 0 {
            return Err(PipelineError::Config("model.n_estimators must be positive".to_string()));
        }
        Ok(())
    }

    /// Builder method to set the scaler name
    pub fn with_scaler(mut self, scaler: &str) -> Self {
        self.preprocessing.scaler = scaler.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let params: Params = serde_yaml::from_str("{}").unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.split.test_size, 0.2);
        assert!(params.split.shuffle);
        assert_eq!(params.preprocessing.scaler, "none");
        assert_eq!(params.model.model_type, "random_forest");
        assert_eq!(params.model.n_estimators, 200);
        assert_eq!(params.model.max_depth, None);
        assert_eq!(params.model.n_jobs, -1);
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = "seed: 7\nsplit:\n  test_size: 0.25\n  shuffle: false\npreprocessing:\n  scaler: minmax\nmodel:\n  type: linear\n  n_estimators: 50\n  max_depth: 4\n  n_jobs: 2\n";
        let params: Params = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.seed, 7);
        assert!(!params.split.shuffle);
        assert_eq!(params.preprocessing.scaler, "minmax");
        assert_eq!(params.model.model_type, "linear");
        assert_eq!(params.model.max_depth, Some(4));
        assert_eq!(params.model.n_jobs, 2);
    }

    #[test]
    fn test_invalid_test_size() {
        let mut params = Params::default();
        params.split.test_size = 1.0;
        assert!(params.validate().is_err());
    }
}
