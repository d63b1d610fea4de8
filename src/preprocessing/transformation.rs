//! Train/test split, optional scaling and split persistence

use super::scaler::{Scaler, ScalerType};
use super::split::train_test_split;
use crate::config::{AppConfig, Params};
use crate::error::Result;
use crate::utils::frame::{column_names, take_rows};
use crate::utils::DataSaver;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// The four split frames plus the fitted scaler, if any
#[derive(Debug, Clone)]
pub struct SplitData {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: DataFrame,
    pub y_test: DataFrame,
    pub feature_names: Vec<String>,
    pub scaler: Option<Scaler>,
}

/// Splits the validated dataset and persists the splits under the processed directory
#[derive(Debug, Clone)]
pub struct DataTransformation {
    target: String,
    test_size: f64,
    shuffle: bool,
    seed: u64,
    scaler_type: ScalerType,
    processed_dir: PathBuf,
    scaler_path: PathBuf,
}

impl DataTransformation {
    pub fn new(config: &AppConfig, params: &Params) -> Self {
        Self {
            target: config.features.target.clone(),
            test_size: params.split.test_size,
            shuffle: params.split.shuffle,
            seed: params.seed,
            scaler_type: ScalerType::resolve(&params.preprocessing.scaler),
            processed_dir: config.paths.data_processed_dir.clone(),
            scaler_path: config.scaler_path(),
        }
    }

    pub fn scaler_type(&self) -> ScalerType {
        self.scaler_type
    }

    /// Split and scale in memory. The scaler only ever sees training rows.
    pub fn transform(&self, df: &DataFrame) -> Result<SplitData> {
        let y = df.select([self.target.as_str()])?;
        let x = df.drop(&self.target)?;
        let feature_names = column_names(&x);

        let split = train_test_split(df.height(), self.test_size, self.shuffle, self.seed)?;
        let mut x_train = take_rows(&x, &split.train_indices)?;
        let mut x_test = take_rows(&x, &split.test_indices)?;
        let y_train = take_rows(&y, &split.train_indices)?;
        let y_test = take_rows(&y, &split.test_indices)?;

        let scaler = match self.scaler_type {
            ScalerType::None => None,
            kind => {
                let mut scaler = Scaler::new(kind);
                x_train = scaler.fit_transform(&x_train, &feature_names)?;
                x_test = scaler.transform(&x_test)?;
                Some(scaler)
            }
        };

        info!(
            train_rows = x_train.height(),
            test_rows = x_test.height(),
            features = feature_names.len(),
            scaler = self.scaler_type.as_str(),
            "Data split"
        );

        Ok(SplitData {
            x_train,
            x_test,
            y_train,
            y_test,
            feature_names,
            scaler,
        })
    }

    /// Transform and write `X_train`, `X_test`, `y_train`, `y_test` and the scaler
    pub fn run(&self, df: &DataFrame) -> Result<SplitData> {
        let mut data = self.transform(df)?;
        std::fs::create_dir_all(&self.processed_dir)?;

        for (stem, frame) in [
            ("X_train", &mut data.x_train),
            ("X_test", &mut data.x_test),
            ("y_train", &mut data.y_train),
            ("y_test", &mut data.y_test),
        ] {
            let path = self.processed_dir.join(format!("{stem}.csv"));
            DataSaver::save_csv(frame, &path)?;
            debug!(path = %path.display(), rows = frame.height(), "Split written");
        }

        match &data.scaler {
            Some(scaler) => {
                scaler.save(&self.scaler_path)?;
                info!(path = %self.scaler_path.display(), "Scaler saved");
            }
            None if self.scaler_path.exists() => {
                std::fs::remove_file(&self.scaler_path)?;
                info!(path = %self.scaler_path.display(), "Removed stale scaler");
            }
            None => {}
        }

        Ok(data)
    }
}
