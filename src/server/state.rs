//! Read-only serving state, loaded once at startup

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::preprocessing::Scaler;
use crate::training::{load_feature_names, TrainedModel};
use ndarray::Array1;
use tracing::info;

use super::request::{frame_records, parse_request};

/// Artifacts shared by every request. Never mutated after [`AppState::load`].
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub feature_names: Vec<String>,
    pub model: TrainedModel,
    pub scaler: Option<Scaler>,
}

impl AppState {
    /// Load `features.json`, `model.json` and, when present, `scaler.json`.
    ///
    /// A missing model or feature list is fatal; so is a model fitted on a different
    /// number of columns than the feature list names.
    pub fn load(config: AppConfig) -> Result<Self> {
        let feature_names = load_feature_names(&config.features_path())?;
        let model = TrainedModel::load(&config.model_path())?;
        if model.n_features() != feature_names.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} features from features.json", feature_names.len()),
                actual: format!("model fitted on {} features", model.n_features()),
            });
        }

        let scaler_path = config.scaler_path();
        let scaler = if scaler_path.exists() {
            Some(Scaler::load(&scaler_path)?)
        } else {
            None
        };
        if let Some(scaler) = &scaler {
            let unknown: Vec<String> = scaler
                .columns()
                .iter()
                .filter(|c| !feature_names.contains(c))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(PipelineError::schema(
                    format!("Scaler columns not in features.json: {unknown:?}"),
                    unknown,
                ));
            }
        }

        info!(
            model = model.model_type().as_str(),
            features = feature_names.len(),
            scaler = scaler.as_ref().map(|s| s.scaler_type().as_str()).unwrap_or("none"),
            "Serving artifacts loaded"
        );

        Ok(Self::from_parts(config, feature_names, model, scaler))
    }

    pub fn from_parts(
        config: AppConfig,
        feature_names: Vec<String>,
        model: TrainedModel,
        scaler: Option<Scaler>,
    ) -> Self {
        Self {
            config,
            feature_names,
            model,
            scaler,
        }
    }

    /// Score a raw request body; predictions follow record order
    pub fn predict_body(&self, body: &[u8]) -> Result<Array1<f64>> {
        let records = parse_request(body)?;
        let x = frame_records(&records, &self.feature_names)?;
        let x = match &self.scaler {
            Some(scaler) => scaler.transform_array(&x, &self.feature_names)?,
            None => x,
        };
        self.model.predict(&x)
    }
}
