//! datascience - tabular regression workflow
//!
//! Batch stages chained by the CLI, each reading and writing files under the
//! configured directories:
//!
//! - [`data`] - ingestion, required-column validation, raw data contract
//! - [`preprocessing`] - seeded train/test split and optional feature scaling
//! - [`training`] - linear regression and random forest, persisted as JSON
//! - [`evaluation`] - RMSE/MAE/R² against a train-mean baseline
//! - [`diagnostics`] - residual and importance charts plus a markdown report
//!
//! The [`server`] loads the trained artifacts once and answers `/health` and
//! `/predict`.

pub mod error;
pub mod config;
pub mod utils;

pub mod data;
pub mod preprocessing;
pub mod training;
pub mod evaluation;
pub mod diagnostics;
pub mod pipeline;

pub mod server;
pub mod cli;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PipelineError, Result};

    pub use crate::config::{AppConfig, ModelParams, Params, Schema};

    pub use crate::data::{ContractReport, ContractViolation, DataContract, DataIngestion, DataValidation};

    pub use crate::preprocessing::{DataTransformation, Scaler, ScalerType, SplitData};

    pub use crate::training::{LinearRegression, ModelTrainer, ModelType, RandomForest, TrainedModel};

    pub use crate::evaluation::{MetricsRecord, ModelEvaluation, RegressionMetrics};

    pub use crate::diagnostics::ModelDiagnostics;

    pub use crate::pipeline::Pipeline;

    pub use crate::server::{create_router, AppState, ServerConfig};
}
