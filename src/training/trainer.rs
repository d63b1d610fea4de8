//! Fits the configured model on the persisted training split

use super::models::TrainedModel;
use crate::config::{AppConfig, Params};
use crate::error::{PipelineError, Result};
use crate::utils::frame::{column_names, columns_to_array2, first_column_name, lenient_numeric_column, take_rows};
use crate::utils::{write_json, DataLoader};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Output of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    pub model: TrainedModel,
    /// Column order the model was fitted on
    pub feature_names: Vec<String>,
    pub n_rows: usize,
}

pub struct ModelTrainer<'a> {
    config: &'a AppConfig,
    params: &'a Params,
}

impl<'a> ModelTrainer<'a> {
    pub fn new(config: &'a AppConfig, params: &'a Params) -> Self {
        Self { config, params }
    }

    /// Fit on `X_train`/`y_train` and write `model.json` plus `features.json`
    pub fn run(&self) -> Result<TrainingOutput> {
        let loader = DataLoader::new();
        let x_train = loader.load_csv(&self.config.split_path("X_train"))?;
        let y_train = loader.load_csv(&self.config.split_path("y_train"))?;

        let feature_names = column_names(&x_train);
        let (x, y) = training_matrix(&x_train, &y_train, &feature_names)?;

        let model = TrainedModel::fit(&self.params.model, self.params.seed, &x, &y)?;
        if model.n_features() != feature_names.len() {
            return Err(PipelineError::Training(format!(
                "model fitted on {} features but {} names recorded",
                model.n_features(),
                feature_names.len()
            )));
        }

        std::fs::create_dir_all(&self.config.paths.model_dir)?;
        write_json(&feature_names, &self.config.features_path())?;
        model.save(&self.config.model_path())?;

        info!(
            model = model.model_type().as_str(),
            rows = x.nrows(),
            features = feature_names.len(),
            path = %self.config.model_path().display(),
            "Model trained"
        );

        Ok(TrainingOutput {
            model,
            feature_names,
            n_rows: x.nrows(),
        })
    }
}

/// Feature matrix and target vector, dropping rows whose target is not numeric.
///
/// Features themselves are coerced strictly.
pub fn training_matrix(
    x_df: &DataFrame,
    y_df: &DataFrame,
    feature_names: &[String],
) -> Result<(Array2<f64>, Array1<f64>)> {
    if x_df.height() != y_df.height() {
        return Err(PipelineError::ShapeError {
            expected: format!("{} target rows", x_df.height()),
            actual: format!("{} target rows", y_df.height()),
        });
    }

    let (kept, y) = coerce_target(y_df)?;
    let x = if kept.len() == x_df.height() {
        columns_to_array2(x_df, feature_names)?
    } else {
        columns_to_array2(&take_rows(x_df, &kept)?, feature_names)?
    };
    Ok((x, y))
}

/// Lenient target coercion: returns the surviving row positions and their values
pub fn coerce_target(y_df: &DataFrame) -> Result<(Vec<usize>, Array1<f64>)> {
    let name = first_column_name(y_df)?;
    let values = lenient_numeric_column(y_df, &name)?;

    let (kept, y): (Vec<usize>, Vec<f64>) = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i, v)))
        .unzip();

    let dropped = values.len() - kept.len();
    if dropped > 0 {
        warn!(column = %name, dropped, "Dropped rows with non-numeric target");
    }
    if kept.is_empty() {
        return Err(PipelineError::CoercionFailure(format!(
            "Target column '{name}' has no numeric values"
        )));
    }

    Ok((kept, Array1::from_vec(y)))
}

/// Read `features.json`
pub fn load_feature_names(path: &Path) -> Result<Vec<String>> {
    crate::utils::read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_target_drops_bad_rows() {
        let y = df!("quality" => &["5", "six", "7", ""]).unwrap();
        let (kept, values) = coerce_target(&y).unwrap();
        assert_eq!(kept, vec![0, 2]);
        assert_eq!(values.to_vec(), vec![5.0, 7.0]);
    }

    #[test]
    fn test_coerce_target_all_bad() {
        let y = df!("quality" => &["a", "b"]).unwrap();
        let err = coerce_target(&y).unwrap_err();
        assert!(matches!(err, PipelineError::CoercionFailure(_)));
    }

    #[test]
    fn test_training_matrix_keeps_rows_aligned() {
        let x = df!("a" => &[1.0, 2.0, 3.0], "b" => &[10.0, 20.0, 30.0]).unwrap();
        let y = df!("t" => &["1", "?", "3"]).unwrap();
        let names = vec!["a".to_string(), "b".to_string()];

        let (xm, ym) = training_matrix(&x, &y, &names).unwrap();
        assert_eq!(xm.nrows(), 2);
        assert_eq!(xm[[1, 0]], 3.0);
        assert_eq!(xm[[1, 1]], 30.0);
        assert_eq!(ym.to_vec(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_non_numeric_feature_fails() {
        let x = df!("a" => &["x", "y"]).unwrap();
        let y = df!("t" => &[1.0, 2.0]).unwrap();
        let err = training_matrix(&x, &y, &["a".to_string()]).unwrap_err();
        assert!(matches!(err, PipelineError::CoercionFailure(_)));
    }
}
