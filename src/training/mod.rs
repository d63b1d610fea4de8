//! Model training
//!
//! Two model families are available, both hand-written on top of `ndarray`:
//! - [`LinearRegression`]: ordinary least squares via the normal equations
//! - [`RandomForest`]: bagged CART regression trees built in parallel with `rayon`
//!
//! [`ModelTrainer`] fits the configured family on the persisted training split.

pub mod decision_tree;
pub mod linear_models;
mod models;
pub mod random_forest;
mod trainer;

pub use decision_tree::{DecisionTree, TreeNode};
pub use linear_models::LinearRegression;
pub use models::{ModelType, TrainedModel};
pub use random_forest::RandomForest;
pub use trainer::{coerce_target, load_feature_names, training_matrix, ModelTrainer, TrainingOutput};
