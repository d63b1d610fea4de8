//! Post-training diagnostics
//!
//! Writes residual, prediction and importance charts plus a markdown report to the
//! reports directory. Callers discover the artifacts through the returned paths.

pub mod charts;

use crate::config::AppConfig;
use crate::error::Result;
use crate::evaluation::{MetricsRecord, RegressionMetrics, TestPredictions};
use crate::training::TrainedModel;
use crate::utils::{read_json, write_json};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

const RESIDUAL_BINS: usize = 30;
const TARGET_BINS: usize = 6;
const TOP_FEATURES: usize = 10;

/// Mean absolute error over one target-value range
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub mae: f64,
}

impl TargetBin {
    fn label(&self, first: bool) -> String {
        let open = if first { '[' } else { '(' };
        format!("{open}{:.2}, {:.2}]", self.lower, self.upper)
    }
}

/// Equal-width bins over `[min, max]` of `y_true`; right edges inclusive, the lowest
/// edge inclusive too. Empty bins are omitted.
pub fn error_by_target(y_true: &Array1<f64>, y_pred: &Array1<f64>, n_bins: usize) -> Vec<TargetBin> {
    let n_bins = n_bins.max(1);
    let (lo, hi) = y_true
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return Vec::new();
    }
    let width = (hi - lo) / n_bins as f64;

    let mut sums = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        let idx = if width > 0.0 {
            // (lower, upper] intervals, so exact edges fall into the lower bin
            let pos = (t - lo) / width;
            (pos.ceil() as usize).saturating_sub(1).min(n_bins - 1)
        } else {
            0
        };
        sums[idx] += (t - p).abs();
        counts[idx] += 1;
    }

    (0..n_bins)
        .filter(|&i| counts[i] > 0)
        .map(|i| TargetBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == n_bins { hi } else { lo + (i + 1) as f64 * width },
            count: counts[i],
            mae: sums[i] / counts[i] as f64,
        })
        .collect()
}

/// One entry of `feature_importance.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Tree importances, or absolute linear coefficients, sorted descending and truncated
/// to the top entries. `None` when the model exposes neither.
pub fn importance_ranking(model: &TrainedModel, feature_names: &[String]) -> Option<(&'static str, Vec<FeatureImportance>)> {
    let (kind, values) = match (model.feature_importances(), model.coefficients()) {
        (Some(imp), _) => ("importance", imp.to_vec()),
        (None, Some(coef)) => ("|coefficient|", coef.iter().map(|c| c.abs()).collect()),
        (None, None) => return None,
    };

    let mut ranking: Vec<FeatureImportance> = feature_names
        .iter()
        .zip(values)
        .map(|(name, importance)| FeatureImportance {
            feature: name.clone(),
            importance,
        })
        .collect();
    ranking.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranking.truncate(TOP_FEATURES);
    Some((kind, ranking))
}

/// Produces every diagnostic artifact for the current model
pub struct ModelDiagnostics<'a> {
    config: &'a AppConfig,
}

impl<'a> ModelDiagnostics<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    fn reports_file(&self, name: &str) -> PathBuf {
        self.config.paths.reports_dir.join(name)
    }

    pub fn run(&self) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.paths.reports_dir)?;
        let preds = TestPredictions::load(self.config)?;
        let y_true = preds.y_true.to_vec();
        let y_pred = preds.y_pred.to_vec();
        let mut artifacts = Vec::new();

        let residuals: Vec<f64> = y_true.iter().zip(&y_pred).map(|(t, p)| t - p).collect();
        let path = self.reports_file("residuals_hist.svg");
        charts::histogram(&path, "Residuals (true - predicted)", "Residual", &residuals, RESIDUAL_BINS)?;
        artifacts.push(path);

        let path = self.reports_file("pred_vs_true.svg");
        charts::scatter_with_identity(&path, "Predicted vs true", &y_true, &y_pred)?;
        artifacts.push(path);

        let bins = error_by_target(&preds.y_true, &preds.y_pred, TARGET_BINS);
        if !bins.is_empty() {
            let labels: Vec<String> = bins.iter().enumerate().map(|(i, b)| b.label(i == 0)).collect();
            let maes: Vec<f64> = bins.iter().map(|b| b.mae).collect();
            let path = self.reports_file("error_by_target.svg");
            charts::bar_chart(&path, "Mean absolute error by target range", "MAE", &labels, &maes)?;
            artifacts.push(path);
        }

        match importance_ranking(&preds.model, &preds.feature_names) {
            Some((kind, ranking)) => {
                let path = self.reports_file("feature_importance.json");
                write_json(&ranking, &path)?;
                artifacts.push(path);

                let labels: Vec<String> = ranking.iter().map(|r| r.feature.clone()).collect();
                let values: Vec<f64> = ranking.iter().map(|r| r.importance).collect();
                let path = self.reports_file("feature_importance.svg");
                charts::bar_chart(&path, "Top features", kind, &labels, &values)?;
                artifacts.push(path);
            }
            None => info!("Model exposes no importances or coefficients"),
        }

        let path = self.reports_file("report.md");
        let report = render_report(y_true.len(), self.load_metrics().as_ref(), &artifacts);
        std::fs::write(&path, report)?;
        artifacts.push(path);

        info!(artifacts = artifacts.len(), dir = %self.config.paths.reports_dir.display(), "Diagnostics written");
        Ok(artifacts)
    }

    /// Previously written metrics, if any
    fn load_metrics(&self) -> Option<MetricsRecord> {
        match read_json(&self.config.metrics_path()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Metrics unavailable for report");
                None
            }
        }
    }
}

fn metrics_lines(title: &str, metrics: Option<&RegressionMetrics>) -> String {
    let mut out = format!("## {title}\n\n");
    match metrics {
        Some(m) => {
            out.push_str(&format!("- RMSE: {:.4}\n", m.rmse));
            out.push_str(&format!("- MAE: {:.4}\n", m.mae));
            out.push_str(&format!("- R2: {:.4}\n\n", m.r2));
        }
        None => out.push_str("- n/a\n\n"),
    }
    out
}

fn render_report(n_test: usize, metrics: Option<&MetricsRecord>, artifacts: &[PathBuf]) -> String {
    let mut out = String::from("# Model diagnostics\n\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(record) = metrics {
        out.push_str(&format!("Target: `{}`\n\n", record.target));
    }
    out.push_str(&format!("Test rows: {n_test}\n\n"));

    out.push_str(&metrics_lines("Baseline (train mean)", metrics.map(|m| &m.baseline)));
    out.push_str(&metrics_lines("Model", metrics.map(|m| &m.model)));

    out.push_str("## Artifacts\n\n");
    for path in artifacts {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        out.push_str(&format!("- {name}\n"));
    }
    out
}
