//! Event-based down-sampling filters.
//!
//! Converts a dense return series into a sparse set of event positions
//! worth feeding to a downstream model.

pub mod cusum;

pub use cusum::{CusumEvents, CusumFilter};
