//! Virtual-ETF return rebasing.
//!
//! Turns a weighted basket of assets into the return series of a single
//! synthetic instrument by applying weights to returns, not price levels.

pub mod trick;

pub use trick::{EtfError, EtfResult, EtfTrick, EtfTrickFit, WeightNotice};
