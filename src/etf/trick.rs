//! The ETF trick: rebase a weighted basket into one synthetic instrument.
//!
//! From a (T × N) price matrix and an N-length weight vector, `fit()`
//! derives:
//! - per-asset simple returns and their cumulative products,
//! - the weighted "virtual ETF" return series,
//! - the cumulative ETF value series (starts from 1).
//!
//! All derived series are (T − 1)-long, the first price row having no
//! prior price to rebase against.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::data::{PriceTable, TableResult};

/// Weight sums within this distance of 1.0 are accepted as normalized.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

#[derive(Error, Debug)]
pub enum EtfError {
    #[error("weight vector has {weights} entries for {assets} asset columns")]
    ShapeMismatch { weights: usize, assets: usize },

    #[error("price matrix needs at least 2 rows to compute returns, got {0}")]
    TooFewRows(usize),
}

pub type EtfResult<T> = Result<T, EtfError>;

/// Advisory raised when the supplied weights did not sum to 1.0.
///
/// Carries the original sum and, when normalization was applied, the
/// rescaled weights. Also emitted through `tracing::warn!`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightNotice {
    pub original_sum: f64,
    pub rescaled_weights: Option<Vec<f64>>,
}

/// Weighted-basket return rebaser.
///
/// Construction validates shape alignment and weight normalization;
/// `fit()` computes the derived return series.
#[derive(Debug, Clone)]
pub struct EtfTrick<L> {
    prices: PriceTable<L>,
    weights: Vec<f64>,
    notice: Option<WeightNotice>,
}

impl<L> EtfTrick<L> {
    /// Create a rebaser, normalizing the weights when they do not sum to 1.
    pub fn new(prices: PriceTable<L>, weights: Vec<f64>) -> EtfResult<Self> {
        Self::with_options(prices, weights, true)
    }

    /// Create a rebaser with explicit control over weight normalization.
    ///
    /// When the weight sum deviates from 1.0 by at least `1e-8`, a
    /// [`WeightNotice`] is recorded and logged; with
    /// `normalize_weights = false` the weights are left unmodified.
    pub fn with_options(
        prices: PriceTable<L>,
        mut weights: Vec<f64>,
        normalize_weights: bool,
    ) -> EtfResult<Self> {
        if weights.len() != prices.n_cols() {
            return Err(EtfError::ShapeMismatch {
                weights: weights.len(),
                assets: prices.n_cols(),
            });
        }
        if prices.n_rows() < 2 {
            return Err(EtfError::TooFewRows(prices.n_rows()));
        }

        let sum: f64 = weights.iter().sum();
        let notice = if (sum - 1.0).abs() >= WEIGHT_SUM_TOLERANCE {
            if normalize_weights {
                for w in &mut weights {
                    *w /= sum;
                }
                warn!(
                    original_sum = sum,
                    new_weights = ?weights,
                    "weights rescaled to sum to 1.0"
                );
                Some(WeightNotice {
                    original_sum: sum,
                    rescaled_weights: Some(weights.clone()),
                })
            } else {
                warn!(sum, "sum of weights is not 1.0");
                Some(WeightNotice {
                    original_sum: sum,
                    rescaled_weights: None,
                })
            }
        } else {
            None
        };

        Ok(Self {
            prices,
            weights,
            notice,
        })
    }

    /// Effective weights (rescaled when normalization applied).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The normalization advisory, if one was raised at construction.
    pub fn weight_notice(&self) -> Option<&WeightNotice> {
        self.notice.as_ref()
    }

    /// Compute the derived return series.
    ///
    /// Accessors for the derived quantities live on the returned
    /// [`EtfTrickFit`], so they are unreachable before fitting.
    pub fn fit(&self) -> EtfTrickFit<'_, L> {
        let t = self.prices.n_rows();
        let n = self.prices.n_cols();
        let periods = t - 1;

        let mut returns = Vec::with_capacity(periods * n);
        for row in 1..t {
            for col in 0..n {
                let prev = self.prices.value(row - 1, col);
                let curr = self.prices.value(row, col);
                returns.push(curr / prev - 1.0);
            }
        }

        // Running product of (1 + r) down each asset column.
        let mut cumulative = Vec::with_capacity(periods * n);
        let mut acc = vec![1.0_f64; n];
        for row in 0..periods {
            for col in 0..n {
                acc[col] *= 1.0 + returns[row * n + col];
                cumulative.push(acc[col]);
            }
        }

        let etf_returns: Vec<f64> = (0..periods)
            .map(|row| {
                self.weights
                    .iter()
                    .enumerate()
                    .map(|(col, w)| returns[row * n + col] * w)
                    .sum()
            })
            .collect();

        let mut etf_cumulative = Vec::with_capacity(periods);
        let mut value = 1.0_f64;
        for &r in &etf_returns {
            value *= 1.0 + r;
            etf_cumulative.push(value);
        }

        EtfTrickFit {
            trick: self,
            returns,
            cumulative,
            etf_returns,
            etf_cumulative,
        }
    }
}

/// Derived quantities of a fitted [`EtfTrick`].
///
/// All row dimensions are `n_periods() == T - 1`; labels, when present
/// on the input, align with input rows `1..T`.
#[derive(Debug)]
pub struct EtfTrickFit<'a, L> {
    trick: &'a EtfTrick<L>,
    returns: Vec<f64>,
    cumulative: Vec<f64>,
    etf_returns: Vec<f64>,
    etf_cumulative: Vec<f64>,
}

impl<L> EtfTrickFit<'_, L> {
    pub fn n_periods(&self) -> usize {
        self.etf_returns.len()
    }

    pub fn n_assets(&self) -> usize {
        self.trick.prices.n_cols()
    }

    /// Per-asset simple returns, row-major (periods × assets).
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Per-asset cumulative returns, row-major (periods × assets).
    pub fn cumulative_returns(&self) -> &[f64] {
        &self.cumulative
    }

    /// One period's returns across all assets.
    pub fn returns_row(&self, t: usize) -> &[f64] {
        let n = self.n_assets();
        &self.returns[t * n..(t + 1) * n]
    }

    /// One period's cumulative returns across all assets.
    pub fn cumulative_row(&self, t: usize) -> &[f64] {
        let n = self.n_assets();
        &self.cumulative[t * n..(t + 1) * n]
    }

    /// Virtual ETF return per period.
    pub fn etf_returns(&self) -> &[f64] {
        &self.etf_returns
    }

    /// Cumulative virtual ETF value per period (starts from 1).
    pub fn etf_cumulative_returns(&self) -> &[f64] {
        &self.etf_cumulative
    }

    /// Row labels for the derived series: input labels `1..T`.
    pub fn row_labels(&self) -> TableResult<&[L]> {
        Ok(&self.trick.prices.row_labels()?[1..])
    }

    /// Asset column names, if the input carried them.
    pub fn columns(&self) -> TableResult<&[String]> {
        self.trick.prices.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableError;
    use chrono::NaiveDate;

    const TOL: f64 = 1e-10;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn two_asset_table() -> PriceTable<NaiveDate> {
        // Column 0 doubles then halves; column 1 climbs 10% each step.
        PriceTable::from_rows(vec![
            vec![100.0, 10.0],
            vec![200.0, 11.0],
            vec![100.0, 12.1],
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = EtfTrick::new(two_asset_table(), vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            EtfError::ShapeMismatch {
                weights: 1,
                assets: 2
            }
        ));
    }

    #[test]
    fn test_single_row_rejected() {
        let table: PriceTable<NaiveDate> = PriceTable::from_rows(vec![vec![100.0, 10.0]]).unwrap();
        assert!(matches!(
            EtfTrick::new(table, vec![0.5, 0.5]).unwrap_err(),
            EtfError::TooFewRows(1)
        ));
    }

    #[test]
    fn test_normalized_weights_untouched_and_silent() {
        let trick = EtfTrick::new(two_asset_table(), vec![0.5, 0.5]).unwrap();
        assert_eq!(trick.weights(), &[0.5, 0.5]);
        assert!(trick.weight_notice().is_none());
    }

    #[test]
    fn test_unnormalized_weights_rescaled_with_notice() {
        let trick = EtfTrick::new(two_asset_table(), vec![1.0, 3.0]).unwrap();
        assert!((trick.weights()[0] - 0.25).abs() < TOL);
        assert!((trick.weights()[1] - 0.75).abs() < TOL);
        assert!((trick.weights().iter().sum::<f64>() - 1.0).abs() < 1e-8);

        let notice = trick.weight_notice().unwrap();
        assert!((notice.original_sum - 4.0).abs() < TOL);
        assert!(notice.rescaled_weights.is_some());
    }

    #[test]
    fn test_unnormalized_weights_kept_when_normalization_off() {
        let trick = EtfTrick::with_options(two_asset_table(), vec![1.0, 3.0], false).unwrap();
        assert_eq!(trick.weights(), &[1.0, 3.0]);
        let notice = trick.weight_notice().unwrap();
        assert!((notice.original_sum - 4.0).abs() < TOL);
        assert!(notice.rescaled_weights.is_none());
    }

    #[test]
    fn test_per_asset_returns() {
        let trick = EtfTrick::new(two_asset_table(), vec![0.5, 0.5]).unwrap();
        let fit = trick.fit();
        assert_eq!(fit.n_periods(), 2);
        assert_eq!(fit.n_assets(), 2);

        assert!((fit.returns_row(0)[0] - 1.0).abs() < TOL);
        assert!((fit.returns_row(0)[1] - 0.1).abs() < TOL);
        assert!((fit.returns_row(1)[0] - (-0.5)).abs() < TOL);
        assert!((fit.returns_row(1)[1] - 0.1).abs() < TOL);
    }

    #[test]
    fn test_cumulative_is_running_product_of_returns() {
        let trick = EtfTrick::new(two_asset_table(), vec![0.5, 0.5]).unwrap();
        let fit = trick.fit();

        for col in 0..fit.n_assets() {
            let mut product = 1.0;
            for t in 0..fit.n_periods() {
                product *= 1.0 + fit.returns_row(t)[col];
                assert!((fit.cumulative_row(t)[col] - product).abs() < TOL);
            }
        }
        // Column 0 round-trips to 1.0: doubled then halved.
        assert!((fit.cumulative_row(1)[0] - 1.0).abs() < TOL);
    }

    #[test]
    fn test_etf_series_are_weighted_and_compounded() {
        let trick = EtfTrick::new(two_asset_table(), vec![0.5, 0.5]).unwrap();
        let fit = trick.fit();

        let etf = fit.etf_returns();
        assert!((etf[0] - 0.55).abs() < TOL); // 0.5*1.0 + 0.5*0.1
        assert!((etf[1] - (-0.2)).abs() < TOL); // 0.5*-0.5 + 0.5*0.1

        let mut product = 1.0;
        for t in 0..fit.n_periods() {
            product *= 1.0 + etf[t];
            assert!((fit.etf_cumulative_returns()[t] - product).abs() < TOL);
        }
    }

    #[test]
    fn test_labels_shift_by_one_row() {
        let table = PriceTable::from_labeled(
            vec![d(1), d(2), d(3)],
            vec!["SPY".to_string(), "TLT".to_string()],
            vec![vec![100.0, 10.0], vec![200.0, 11.0], vec![100.0, 12.1]],
        )
        .unwrap();
        let trick = EtfTrick::new(table, vec![0.5, 0.5]).unwrap();
        let fit = trick.fit();
        assert_eq!(fit.row_labels().unwrap(), &[d(2), d(3)]);
        assert_eq!(fit.columns().unwrap(), &["SPY".to_string(), "TLT".to_string()]);
    }

    #[test]
    fn test_label_lookup_fails_on_raw_input() {
        let trick = EtfTrick::new(two_asset_table(), vec![0.5, 0.5]).unwrap();
        let fit = trick.fit();
        assert!(matches!(
            fit.row_labels().unwrap_err(),
            TableError::MissingLabels
        ));
        assert!(matches!(
            fit.columns().unwrap_err(),
            TableError::MissingColumns
        ));
    }
}
