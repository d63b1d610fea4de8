//! Model selection and the persisted model artifact

use super::linear_models::LinearRegression;
use super::random_forest::RandomForest;
use crate::config::ModelParams;
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

/// Supported model families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Ordinary least squares
    Linear,
    /// Bootstrap-aggregated regression trees
    RandomForest,
}

impl ModelType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" | "linear_regression" | "ols" => Some(ModelType::Linear),
            "random_forest" | "randomforest" | "rf" | "forest" => Some(ModelType::RandomForest),
            _ => None,
        }
    }

    /// Any name other than a linear one selects the forest; unknown names are logged
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(model = %name, "Unknown model type, falling back to random_forest");
            ModelType::RandomForest
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Linear => "linear",
            ModelType::RandomForest => "random_forest",
        }
    }
}

/// A fitted regressor, serialised as `model.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainedModel {
    Linear(LinearRegression),
    RandomForest(RandomForest),
}

impl TrainedModel {
    /// Fit the model family selected by `params.type`
    pub fn fit(params: &ModelParams, seed: u64, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        match ModelType::resolve(&params.model_type) {
            ModelType::Linear => {
                let mut model = LinearRegression::new();
                model.fit(x, y)?;
                Ok(TrainedModel::Linear(model))
            }
            ModelType::RandomForest => {
                let mut model = RandomForest::new(params.n_estimators)
                    .with_max_depth(params.max_depth)
                    .with_random_state(seed)
                    .with_n_jobs(params.n_jobs);
                model.fit(x, y)?;
                Ok(TrainedModel::RandomForest(model))
            }
        }
    }

    pub fn model_type(&self) -> ModelType {
        match self {
            TrainedModel::Linear(_) => ModelType::Linear,
            TrainedModel::RandomForest(_) => ModelType::RandomForest,
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            TrainedModel::Linear(m) => m.predict(x),
            TrainedModel::RandomForest(m) => m.predict(x),
        }
    }

    /// Number of input columns the model was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            TrainedModel::Linear(m) => m.n_features().unwrap_or(0),
            TrainedModel::RandomForest(m) => m.n_features(),
        }
    }

    /// Tree-based importances, when the model has them
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        match self {
            TrainedModel::RandomForest(m) => m.feature_importances(),
            TrainedModel::Linear(_) => None,
        }
    }

    /// Linear coefficients, when the model has them
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        match self {
            TrainedModel::Linear(m) => m.coefficients.as_ref(),
            TrainedModel::RandomForest(_) => None,
        }
    }

    /// Write compact JSON; forests are large
    pub fn save(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
