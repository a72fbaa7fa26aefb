//! Leakage-aware model validation.
//!
//! Provides the embargoed time-series cross-validation splitter: train
//! and test windows separated by a gap of excluded samples so temporal
//! dependency cannot leak future information into training.

pub mod embargo;

pub use embargo::{EmbargoCv, Fold, FoldIter, SplitError, SplitResult, Splitter};
