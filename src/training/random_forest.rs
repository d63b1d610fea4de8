//! Random forest regressor

use super::decision_tree::DecisionTree;
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bootstrap-aggregated regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn per split (None = all features)
    pub max_features: Option<usize>,
    /// Tree `i` is seeded with `random_state + i`
    pub random_state: u64,
    /// Worker threads (None = rayon's global pool)
    #[serde(skip)]
    pub n_jobs: Option<usize>,
    feature_importances: Option<Array1<f64>>,
    n_features: usize,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(200)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            random_state: 42,
            n_jobs: None,
            feature_importances: None,
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Thread count from the `n_jobs` convention: `-1` or `0` means every core
    pub fn with_n_jobs(mut self, n_jobs: i64) -> Self {
        self.n_jobs = usize::try_from(n_jobs).ok().filter(|&n| n > 0);
        self
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::Training("no training rows".to_string()));
        }
        if self.n_estimators == 0 {
            return Err(PipelineError::Training("n_estimators must be positive".to_string()));
        }

        let build = || -> Result<Vec<DecisionTree>> {
            (0..self.n_estimators)
                .into_par_iter()
                .map(|tree_idx| self.build_tree(x, y, tree_idx))
                .collect()
        };

        let trees = match self.n_jobs {
            Some(n_threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()
                .map_err(|e| PipelineError::Training(format!("Thread pool error: {}", e)))?
                .install(build)?,
            None => build()?,
        };

        self.n_features = x.ncols();
        self.trees = trees;
        self.compute_feature_importances();
        debug!(trees = self.trees.len(), features = self.n_features, "Forest fitted");
        Ok(self)
    }

    fn build_tree(&self, x: &Array2<f64>, y: &Array1<f64>, tree_idx: usize) -> Result<DecisionTree> {
        let n_samples = x.nrows();
        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state.wrapping_add(tree_idx as u64));

        let sample_indices: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

        let mut tree = DecisionTree::new()
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_max_features(self.max_features);
        tree.fit_rows(x, y, &sample_indices, &mut rng)?;
        Ok(tree)
    }

    /// Mean of the per-tree importances, renormalized to sum to one
    fn compute_feature_importances(&mut self) {
        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (acc, &val) in total.iter_mut().zip(imp.iter()) {
                    *acc += val;
                }
            }
        }

        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            for imp in &mut total {
                *imp /= sum;
            }
        }
        self.feature_importances = Some(Array1::from_vec(total));
    }

    /// Average of the tree predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(PipelineError::ModelNotFitted);
        }

        let per_tree: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        let mut sum = Array1::zeros(x.nrows());
        for preds in &per_tree {
            sum += preds;
        }
        Ok(sum / per_tree.len() as f64)
    }

    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }
}
