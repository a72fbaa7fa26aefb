//! Embargoed time-series cross-validation.
//!
//! Splits an ordered sequence into sequential, equal-size train/test
//! folds with an embargo gap between each fold's train and test
//! segments, preventing temporal leakage into the test window. Folds are
//! disjoint sliding windows, not anchored expanding ones: each fold
//! spans exactly `2 * fold_size` positions (train + embargo + test), and
//! the embargo shrinks the usable test width rather than shifting it.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("fold count must be at least 1")]
    ZeroFolds,
}

pub type SplitResult<T> = Result<T, SplitError>;

/// One train/test partition: two contiguous index ranges with train
/// strictly before test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

impl Fold {
    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    pub fn test_len(&self) -> usize {
        self.test.len()
    }
}

/// Capability contract for cross-validation splitters, consumable by a
/// model-evaluation harness.
pub trait Splitter {
    type Iter: Iterator<Item = Fold>;

    /// Number of splitting iterations this splitter reports for a
    /// sequence of the given length.
    fn get_n_splits(&self, n_samples: usize) -> usize;

    /// Lazy sequence of folds over a sequence of the given length.
    fn split(&self, n_samples: usize) -> Self::Iter;
}

/// Sequential K-fold splitter with an embargo gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbargoCv {
    n_splits: usize,
    embargo_size: usize,
}

impl EmbargoCv {
    /// Create a splitter with `cv` folds and an embargo of
    /// `embargo_size` excluded positions between train and test.
    ///
    /// An embargo at least as large as the fold size leaves each fold
    /// with an empty test range.
    pub fn new(cv: usize, embargo_size: usize) -> SplitResult<Self> {
        if cv == 0 {
            return Err(SplitError::ZeroFolds);
        }
        Ok(Self {
            n_splits: cv,
            embargo_size,
        })
    }

    pub fn embargo_size(&self) -> usize {
        self.embargo_size
    }
}

impl Splitter for EmbargoCv {
    type Iter = FoldIter;

    /// Reported split count: `min(cv, (n - embargo) / fold_size)` with
    /// `fold_size = n / cv`; 0 when the sequence is shorter than `cv`.
    ///
    /// Note: this feasibility bound does not account for the embargo
    /// reducing the usable test width, so with `embargo_size = 0` the
    /// final counted fold's test window runs past the end of the
    /// sequence and [`split`](Splitter::split) emits one fold fewer
    /// than reported. Kept faithful to the reference arithmetic;
    /// harnesses comparing the two should trust `split`.
    fn get_n_splits(&self, n_samples: usize) -> usize {
        let fold_size = n_samples / self.n_splits;
        if fold_size == 0 {
            return 0;
        }
        let feasible = n_samples.saturating_sub(self.embargo_size) / fold_size;
        self.n_splits.min(feasible)
    }

    /// Fold `i` trains on `[i * fold_size, (i+1) * fold_size)` and tests
    /// on `[train_end + embargo, train_end + fold_size)`. Iteration
    /// stops, without yielding a partial fold, as soon as a test window
    /// would run past the sequence end. Each call derives a fresh
    /// iterator.
    fn split(&self, n_samples: usize) -> FoldIter {
        FoldIter {
            fold_size: n_samples / self.n_splits,
            embargo_size: self.embargo_size,
            n_samples,
            n_splits: self.get_n_splits(n_samples),
            next_fold: 0,
        }
    }
}

/// Lazy fold iterator produced by [`EmbargoCv::split`](Splitter::split).
#[derive(Debug, Clone)]
pub struct FoldIter {
    fold_size: usize,
    embargo_size: usize,
    n_samples: usize,
    n_splits: usize,
    next_fold: usize,
}

impl Iterator for FoldIter {
    type Item = Fold;

    fn next(&mut self) -> Option<Fold> {
        if self.next_fold >= self.n_splits {
            return None;
        }

        let train_start = self.next_fold * self.fold_size;
        let train_end = train_start + self.fold_size;
        let test_end = train_end + self.fold_size;
        if test_end > self.n_samples {
            // Overrun ends the sequence for good, matching the scan
            // order of the fold arithmetic.
            self.next_fold = self.n_splits;
            return None;
        }

        // Embargoes wider than the fold leave an empty test range.
        let test_start = (train_end + self.embargo_size).min(test_end);
        self.next_fold += 1;
        Some(Fold {
            train: train_start..train_end,
            test: test_start..test_end,
        })
    }
}
