//! Feature scaling

use crate::error::{PipelineError, Result};
use crate::utils::frame::numeric_column;
use crate::utils::{read_json, write_json};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Type of scaler to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalerType {
    /// Identity; nothing is fitted or persisted
    None,
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// Min-Max scaling: (x - min) / (max - min)
    MinMax,
}

impl ScalerType {
    /// Parse a configured scaler name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ScalerType::None),
            "standard" => Some(ScalerType::Standard),
            "minmax" => Some(ScalerType::MinMax),
            _ => None,
        }
    }

    /// Like [`ScalerType::from_name`], but unknown names fall back to identity with a warning
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(scaler = %name, "Unknown scaler, falling back to none");
            ScalerType::None
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalerType::None => "none",
            ScalerType::Standard => "standard",
            ScalerType::MinMax => "minmax",
        }
    }
}

/// Per-column parameters: `(x - center) / scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub center: f64,
    pub scale: f64,
}

/// Feature scaler, fitted on named columns in a fixed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    columns: Vec<String>,
    params: Vec<ScalerParams>,
}

impl Scaler {
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            columns: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn scaler_type(&self) -> ScalerType {
        self.scaler_type
    }

    /// Fitted column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_fitted(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Fit the scaler on the given columns of `df`
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let params = columns
            .iter()
            .map(|name| Ok(self.compute_params(&numeric_column(df, name)?)))
            .collect::<Result<Vec<_>>>()?;

        self.columns = columns.to_vec();
        self.params = params;
        Ok(self)
    }

    /// Scale every fitted column of `df`; other columns are left untouched
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted() {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut result = df.clone();
        for (name, params) in self.columns.iter().zip(&self.params) {
            let scaled: Vec<f64> = numeric_column(df, name)?
                .into_iter()
                .map(|v| (v - params.center) / params.scale)
                .collect();
            result.with_column(Series::new(name.as_str().into(), scaled))?;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Scale the columns of a feature matrix laid out as `feature_names`
    pub fn transform_array(&self, x: &Array2<f64>, feature_names: &[String]) -> Result<Array2<f64>> {
        if !self.is_fitted() {
            return Err(PipelineError::ModelNotFitted);
        }
        if x.ncols() != feature_names.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} columns", feature_names.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let unknown: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !feature_names.contains(c))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(PipelineError::schema(
                format!("Scaler columns missing from input: {unknown:?}"),
                unknown,
            ));
        }

        let mut out = x.clone();
        for (j, name) in feature_names.iter().enumerate() {
            if let Some(pos) = self.columns.iter().position(|c| c == name) {
                let params = self.params[pos];
                out.column_mut(j)
                    .mapv_inplace(|v| (v - params.center) / params.scale);
            }
        }
        Ok(out)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    fn compute_params(&self, values: &[f64]) -> ScalerParams {
        match self.scaler_type {
            ScalerType::Standard => {
                let n = values.len().max(1) as f64;
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let std = var.sqrt();
                ScalerParams {
                    center: mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                }
            }
            ScalerType::MinMax => {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let (min, range) = if values.is_empty() { (0.0, 1.0) } else { (min, max - min) };
                ScalerParams {
                    center: min,
                    scale: if range == 0.0 { 1.0 } else { range },
                }
            }
            ScalerType::None => ScalerParams {
                center: 0.0,
                scale: 1.0,
            },
        }
    }
}
