//! Data preprocessing: seeded splitting and feature scaling
//!
//! - [`train_test_split`] partitions row positions reproducibly from a seed
//! - [`Scaler`] fits on training columns and replays on test frames or request rows
//! - [`DataTransformation`] ties both together and persists the split artifacts

mod scaler;
mod split;
mod transformation;

pub use scaler::{Scaler, ScalerParams, ScalerType};
pub use split::{train_test_split, TrainTestSplit};
pub use transformation::{DataTransformation, SplitData};
