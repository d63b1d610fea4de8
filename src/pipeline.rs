//! Stage chains driven by the CLI
//!
//! `data`: ingestion, validation, transformation.
//! `train`: the data chain, then training and evaluation.

use crate::config::{AppConfig, Params, Schema};
use crate::data::{ContractReport, DataContract, DataIngestion, DataValidation};
use crate::diagnostics::ModelDiagnostics;
use crate::error::{PipelineError, Result};
use crate::evaluation::{MetricsRecord, ModelEvaluation};
use crate::preprocessing::{DataTransformation, SplitData};
use crate::training::ModelTrainer;
use crate::utils::frame::column_names;
use polars::prelude::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration and parameters for one invocation
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AppConfig,
    params: Params,
}

impl Pipeline {
    pub fn new(config: AppConfig, params: Params) -> Self {
        Self { config, params }
    }

    /// Read `config.yaml` and `params.yaml`
    pub fn load(config_path: &Path, params_path: &Path) -> Result<Self> {
        Ok(Self::new(AppConfig::load(config_path)?, Params::load(params_path)?))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn validation(&self) -> Result<DataValidation> {
        let schema = Schema::load(self.config.schema_path())?;
        Ok(DataValidation::new(&schema, &self.config))
    }

    /// Ingest, validate and split; writes the split CSVs and the scaler
    pub fn run_data(&self) -> Result<SplitData> {
        self.config.make_dirs()?;
        let df = DataIngestion::new(&self.config).load()?;
        self.validation()?.check_required(&df)?;
        let split = DataTransformation::new(&self.config, &self.params).run(&df)?;
        info!(features = split.feature_names.len(), "Data pipeline complete");
        Ok(split)
    }

    /// Data chain plus training and evaluation; returns the metrics and their path
    pub fn run_train(&self) -> Result<(MetricsRecord, PathBuf)> {
        self.run_data()?;
        ModelTrainer::new(&self.config, &self.params).run()?;
        let (record, path) = ModelEvaluation::new(&self.config).run()?;
        info!(path = %path.display(), "Training pipeline complete");
        Ok((record, path))
    }

    /// Charts and report for the current model
    pub fn run_diagnostics(&self) -> Result<Vec<PathBuf>> {
        ModelDiagnostics::new(&self.config).run()
    }

    /// Required columns plus the raw data contract.
    ///
    /// Missing columns are an error; contract violations are returned in the report.
    pub fn check(&self) -> Result<ContractReport> {
        let df = DataIngestion::new(&self.config).load()?;
        let validation = self.validation()?;
        validation.check_required(&df)?;
        let report = DataContract::new(validation.target(), self.config.quality.clone()).check(&df)?;
        info!(
            rows = report.rows,
            duplicates = report.duplicate_rows,
            violations = report.violations.len(),
            "Data contract checked"
        );
        Ok(report)
    }

    /// `{"data": ...}` body built from the first `rows` raw rows without the target.
    ///
    /// One row gives a single object, more give an array.
    pub fn sample_payload(&self, rows: usize) -> Result<Value> {
        if rows == 0 {
            return Err(PipelineError::Config("sample needs at least one row".to_string()));
        }
        let df = DataIngestion::new(&self.config).load()?;
        let features = df.drop(&self.config.features.target)?.head(Some(rows));
        let names = column_names(&features);

        let mut records = Vec::with_capacity(features.height());
        for i in 0..features.height() {
            let mut record = Map::new();
            for name in &names {
                let value = features.column(name)?.as_materialized_series().get(i)?;
                record.insert(name.clone(), cell_to_json(value));
            }
            records.push(Value::Object(record));
        }

        let data = if rows == 1 {
            records.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(records)
        };
        let mut body = Map::new();
        body.insert("data".to_string(), data);
        Ok(Value::Object(body))
    }
}

fn cell_to_json(value: AnyValue) -> Value {
    let dtype = value.dtype();
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        v if dtype.is_integer() => v.extract::<i64>().map(Value::from).unwrap_or(Value::Null),
        v if dtype.is_float() => v
            .extract::<f64>()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_json() {
        assert_eq!(cell_to_json(AnyValue::Int64(3)), Value::from(3));
        assert_eq!(cell_to_json(AnyValue::Float64(0.5)), Value::from(0.5));
        assert_eq!(cell_to_json(AnyValue::Float64(f64::NAN)), Value::Null);
        assert_eq!(cell_to_json(AnyValue::String("x")), Value::from("x"));
        assert_eq!(cell_to_json(AnyValue::Null), Value::Null);
    }
}
