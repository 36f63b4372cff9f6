//! Deterministic train/test split.
//!
//! Row indices are shuffled with a seeded `StdRng`; the first `ceil(n * ratio)`
//! shuffled rows form the test set and the rest the training set. The same seed
//! and the same input always produce the same partition.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::Table;
use crate::error::{ErrorKind, PipelineError};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Table,
    pub test: Table,
}

/// Split `table` so that roughly `test_ratio` of its rows end up in the test set.
pub fn train_test_split(table: &Table, test_ratio: f64, seed: u64) -> Result<TrainTestSplit, PipelineError> {
    let (train_idx, test_idx) = split_indices(table.n_rows(), test_ratio, seed)?;
    Ok(TrainTestSplit {
        train: table.select_rows(&train_idx),
        test: table.select_rows(&test_idx),
    })
}

/// Partition `0..n` into `(train, test)` index lists.
///
/// Rejects ratios outside `(0, 1)`, empty inputs, and inputs too small to leave
/// a row on both sides.
pub fn split_indices(n: usize, test_ratio: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>), PipelineError> {
    if !(test_ratio.is_finite() && test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(PipelineError::new(
            ErrorKind::Configuration,
            format!("train_test_split_ratio must be strictly between 0 and 1, got {test_ratio}."),
        ));
    }
    if n == 0 {
        return Err(PipelineError::new(ErrorKind::Data, "Cannot split an empty dataset."));
    }

    let n_test = test_size(n, test_ratio);
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::new(
            ErrorKind::Data,
            format!("Splitting {n} rows with ratio {test_ratio} would leave an empty train or test set."),
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

fn test_size(n: usize, test_ratio: f64) -> usize {
    // Absorb representation error so that e.g. 100 * 0.2 never rounds up to 21.
    (n as f64 * test_ratio - 1e-9).ceil().max(0.0) as usize
}
