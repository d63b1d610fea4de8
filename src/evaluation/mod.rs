//! Test-set evaluation against a mean-predictor baseline

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::training::{coerce_target, load_feature_names, training_matrix, TrainedModel};
use crate::utils::frame::column_names;
use crate::utils::{write_json, DataLoader};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// RMSE, MAE and R² of one set of predictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(PipelineError::Computation("cannot score an empty test set".to_string()));
        }

        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true.iter().zip(y_pred.iter()).map(|(t, p)| t - p).collect();

        let ss_res: f64 = errors.iter().map(|e| e * e).sum();
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean = y_true.sum() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        // constant target: only a perfect fit earns credit
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            rmse: (ss_res / n).sqrt(),
            mae,
            r2,
        })
    }
}

/// Contents of `metrics.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub target: String,
    pub baseline: RegressionMetrics,
    pub model: RegressionMetrics,
}

/// Model predictions on the persisted test split
#[derive(Debug, Clone)]
pub struct TestPredictions {
    pub model: TrainedModel,
    pub feature_names: Vec<String>,
    pub y_true: Array1<f64>,
    pub y_pred: Array1<f64>,
}

impl TestPredictions {
    /// Load the model and test split and predict.
    ///
    /// Feature names come from `features.json`, or the `X_test` header when it is absent.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let loader = DataLoader::new();
        let x_test = loader.load_csv(&config.split_path("X_test"))?;
        let y_test = loader.load_csv(&config.split_path("y_test"))?;
        let model = TrainedModel::load(&config.model_path())?;

        let features_path = config.features_path();
        let feature_names = if features_path.exists() {
            load_feature_names(&features_path)?
        } else {
            column_names(&x_test)
        };

        let (x, y_true) = training_matrix(&x_test, &y_test, &feature_names)?;
        let y_pred = model.predict(&x)?;
        Ok(Self {
            model,
            feature_names,
            y_true,
            y_pred,
        })
    }
}

/// Scores the trained model and writes `metrics.json`
pub struct ModelEvaluation<'a> {
    config: &'a AppConfig,
}

impl<'a> ModelEvaluation<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Returns the record and the path it was written to
    pub fn run(&self) -> Result<(MetricsRecord, PathBuf)> {
        let y_train = DataLoader::new().load_csv(&self.config.split_path("y_train"))?;
        let (_, y_train) = coerce_target(&y_train)?;
        let train_mean = y_train.mean().unwrap_or(0.0);

        let predictions = TestPredictions::load(self.config)?;
        let baseline_pred = Array1::from_elem(predictions.y_true.len(), train_mean);

        let record = MetricsRecord {
            target: self.config.features.target.clone(),
            baseline: RegressionMetrics::compute(&predictions.y_true, &baseline_pred)?,
            model: RegressionMetrics::compute(&predictions.y_true, &predictions.y_pred)?,
        };

        std::fs::create_dir_all(&self.config.paths.reports_dir)?;
        let path = self.config.metrics_path();
        write_json(&record, &path)?;

        info!(
            baseline_rmse = record.baseline.rmse,
            model_rmse = record.model.rmse,
            model_r2 = record.model.r2,
            path = %path.display(),
            "Evaluation complete"
        );
        Ok((record, path))
    }
}
