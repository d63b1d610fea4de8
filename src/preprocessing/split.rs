//! Seeded train/test split

use crate::error::{PipelineError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row positions of one train/test split
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Splits `n_samples` rows; the same seed always yields the same partition.
///
/// The test side takes `ceil(n_samples * test_size)` rows. Without shuffling the
/// last rows, in file order, become the test split.
pub fn train_test_split(
    n_samples: usize,
    test_size: f64,
    shuffle: bool,
    seed: u64,
) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::Config(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::Data(format!(
            "Cannot split {n_samples} rows with test_size={test_size}: both sides need at least one row"
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    if shuffle {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        let train_indices = indices.split_off(n_test);
        Ok(TrainTestSplit {
            train_indices,
            test_indices: indices,
        })
    } else {
        let test_indices = indices.split_off(n_train);
        Ok(TrainTestSplit {
            train_indices: indices,
            test_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let split = train_test_split(10, 0.25, true, 42).unwrap();
        assert_eq!(split.test_indices.len(), 3);
        assert_eq!(split.train_indices.len(), 7);
    }

    #[test]
    fn test_partition_covers_all_rows() {
        let split = train_test_split(50, 0.2, true, 7).unwrap();
        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(&split.test_indices)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = train_test_split(100, 0.3, true, 42).unwrap();
        let b = train_test_split(100, 0.3, true, 42).unwrap();
        let c = train_test_split(100, 0.3, true, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_no_shuffle_keeps_order() {
        let split = train_test_split(5, 0.4, false, 0).unwrap();
        assert_eq!(split.train_indices, vec![0, 1, 2]);
        assert_eq!(split.test_indices, vec![3, 4]);
    }

    #[test]
    fn test_too_few_rows() {
        assert!(train_test_split(1, 0.2, true, 42).is_err());
        assert!(train_test_split(10, 1.0, true, 42).is_err());
    }
}
