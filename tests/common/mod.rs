//! Shared fixture: a throwaway project directory with config, schema, params and raw data

#![allow(dead_code)]

use datascience::config::{AppConfig, Params};
use datascience::pipeline::Pipeline;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FEATURES: [&str; 3] = ["fixed acidity", "alcohol", "pH"];
pub const TARGET: &str = "quality";

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new(scaler: &str, model_type: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("config")).unwrap();
        std::fs::create_dir_all(root.join("data/raw")).unwrap();

        std::fs::write(
            root.join("config/config.yaml"),
            "paths:\n  data_raw: ../data/raw/wine.csv\n  data_processed_dir: ../data/processed\n  model_dir: ../models\n  reports_dir: ../reports\n  schema_file: schema.yaml\nfeatures:\n  target: quality\nio:\n  csv_sep: \";\"\n",
        )
        .unwrap();
        std::fs::write(
            root.join("config/schema.yaml"),
            "target: quality\nrequired:\n  - fixed acidity\n  - alcohol\n  - pH\n",
        )
        .unwrap();
        let ws = Self { dir };
        ws.write_params(scaler, model_type);
        ws.write_raw(&raw_rows(120));
        ws
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config/config.yaml")
    }

    pub fn params_path(&self) -> PathBuf {
        self.root().join("params.yaml")
    }

    pub fn write_params(&self, scaler: &str, model_type: &str) {
        std::fs::write(
            self.params_path(),
            format!(
                "seed: 42\nsplit:\n  test_size: 0.2\n  shuffle: true\npreprocessing:\n  scaler: {scaler}\nmodel:\n  type: {model_type}\n  n_estimators: 10\n  max_depth: 6\n  n_jobs: 2\n"
            ),
        )
        .unwrap();
    }

    pub fn write_schema(&self, body: &str) {
        std::fs::write(self.root().join("config/schema.yaml"), body).unwrap();
    }

    /// Rows are `(fixed acidity, alcohol, pH, quality)`
    pub fn write_raw(&self, rows: &[(f64, f64, f64, f64)]) {
        let mut text = String::from("\"fixed acidity\";\"alcohol\";\"pH\";\"quality\"\n");
        for (fa, alc, ph, q) in rows {
            text.push_str(&format!("{fa};{alc};{ph};{q}\n"));
        }
        std::fs::write(self.root().join("data/raw/wine.csv"), text).unwrap();
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::load(self.config_path()).unwrap()
    }

    pub fn params(&self) -> Params {
        Params::load(self.params_path()).unwrap()
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::load(&self.config_path(), &self.params_path()).unwrap()
    }
}

/// Deterministic rows with a target that is linear in the features
pub fn raw_rows(n: usize) -> Vec<(f64, f64, f64, f64)> {
    (0..n)
        .map(|i| {
            let fa = 6.0 + (i % 10) as f64 * 0.3;
            let alc = 9.0 + ((i * 7) % 13) as f64 * 0.2;
            let ph = 3.0 + ((i * 3) % 11) as f64 * 0.05;
            let quality = 0.5 * fa + 0.2 * alc - ph + 2.0;
            (fa, alc, ph, quality)
        })
        .collect()
}
