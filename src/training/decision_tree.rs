//! CART regression tree

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree node. Children are positions in the tree's node table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf { value: f64, n_samples: usize },
    /// Internal node; samples with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: usize,
        right: usize,
        n_samples: usize,
    },
}

/// Best split found for one node
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    /// Decrease in summed squared error
    gain: f64,
}

/// Regression tree using the squared-error criterion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Flat node table, root first
    nodes: Vec<TreeNode>,
    /// Maximum depth (None = grow until leaves are pure or too small)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features drawn at random for each split (None = all)
    pub max_features: Option<usize>,
    /// Seed used by [`DecisionTree::fit`] when features are subsampled
    pub random_state: u64,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            random_state: 0,
            n_features: 0,
            feature_importances: None,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
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

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Fit on every row of `x`
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        self.fit_rows(x, y, &indices, &mut rng)?;
        Ok(self)
    }

    /// Fit on the rows named by `indices`; repeated indices act as sample weights
    pub(crate) fn fit_rows(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }
        if indices.is_empty() {
            return Err(PipelineError::Training("no training rows".to_string()));
        }

        self.n_features = x.ncols();
        let mut importances = vec![0.0; self.n_features];
        let mut nodes = Vec::new();
        self.build_node(x, y, indices, 0, &mut nodes, &mut importances, rng);
        self.nodes = nodes;

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));
        Ok(())
    }

    /// Grow the subtree for `indices`, returning its position in `nodes`
    #[allow(clippy::too_many_arguments)]
    fn build_node(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<TreeNode>,
        importances: &mut [f64],
        rng: &mut ChaCha8Rng,
    ) -> usize {
        let n_samples = indices.len();
        let value = indices.iter().map(|&i| y[i]).sum::<f64>() / n_samples as f64;
        let position = nodes.len();
        nodes.push(TreeNode::Leaf { value, n_samples });

        let first = y[indices[0]];
        let is_pure = indices.iter().all(|&i| (y[i] - first).abs() < 1e-12);
        if n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.is_some_and(|d| depth >= d)
            || is_pure
        {
            return position;
        }

        let Some(best) = self.find_best_split(x, y, indices, rng) else {
            return position;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature_idx]] <= best.threshold);
        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf {
            return position;
        }

        importances[best.feature_idx] += best.gain;

        let left = self.build_node(x, y, &left_indices, depth + 1, nodes, importances, rng);
        let right = self.build_node(x, y, &right_indices, depth + 1, nodes, importances, rng);
        nodes[position] = TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
        };
        position
    }

    /// Sorted sweep over each candidate feature using running sums
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let n_features = x.ncols();
        let features: Vec<usize> = match self.max_features {
            Some(k) if k > 0 && k < n_features => sample(rng, n_features, k).into_vec(),
            _ => (0..n_features).collect(),
        };

        let n = indices.len() as f64;
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n;

        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(indices.len());

        for feature_idx in features {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (x[[i, feature_idx]], y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for split in 1..pairs.len() {
                let (xv, yv) = pairs[split - 1];
                left_sum += yv;
                left_sq += yv * yv;

                if xv == pairs[split].0 {
                    continue;
                }
                let n_left = split;
                let n_right = pairs.len() - split;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);
                let gain = parent_sse - sse;

                if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold: (xv + pairs[split].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.nodes.is_empty() {
            return Err(PipelineError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(PipelineError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows().into_iter().map(|row| self.predict_sample(row)).collect())
    }

    fn predict_sample(&self, sample: ArrayView1<f64>) -> f64 {
        let mut position = 0;
        loop {
            match &self.nodes[position] {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    position = if sample[*feature_idx] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Normalized impurity-decrease importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    pub fn get_depth(&self) -> usize {
        fn depth(nodes: &[TreeNode], position: usize) -> usize {
            match &nodes[position] {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => {
                    1 + depth(nodes, *left).max(depth(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            depth(&self.nodes, 0)
        }
    }

    pub fn get_n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_regressor_simple() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        // unbounded depth memorises distinct points
        let predictions = tree.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-12);
        }
        assert_eq!(tree.get_n_leaves(), 5);
    }

    #[test]
    fn test_step_function() {
        let x = array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]];
        let y = array![1.0, 1.0, 1.0, 5.0, 5.0, 5.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.get_depth(), 2);
        let pred = tree.predict(&array![[6.5], [-3.0], [100.0]]).unwrap();
        assert_eq!(pred, array![5.0, 1.0, 5.0]);
    }

    #[test]
    fn test_max_depth() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0], [5.0, 5.0]];
        let y = array![0.0, 1.0, 0.0, 1.0, 0.0];

        let mut tree = DecisionTree::new().with_max_depth(Some(1));
        tree.fit(&x, &y).unwrap();
        assert!(tree.get_depth() <= 2);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 0.0, 9.0];

        let mut tree = DecisionTree::new().with_min_samples_leaf(2);
        tree.fit(&x, &y).unwrap();
        // the lone outlier cannot get its own leaf
        assert_eq!(tree.get_n_leaves(), 2);
    }

    #[test]
    fn test_feature_importances() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();

        let importances = tree.feature_importances().unwrap();
        assert!((importances[0] - 1.0).abs() < 1e-12);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_predict_before_fit() {
        let tree = DecisionTree::new();
        assert!(matches!(tree.predict(&array![[1.0]]), Err(PipelineError::ModelNotFitted)));
    }
}
