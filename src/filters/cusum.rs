//! Symmetric CUSUM event filter.
//!
//! Scans a return series with two running sums, one clamped non-negative
//! and one clamped non-positive, and records an event wherever either
//! sum crosses the threshold `h`. Both sums reset to zero on every
//! trigger, so events mark fresh cumulative moves rather than levels.

use crate::data::{ReturnSeries, SeriesResult};

/// Symmetric CUSUM filter over a return series.
#[derive(Debug, Clone)]
pub struct CusumFilter<L> {
    series: ReturnSeries<L>,
    threshold: f64,
}

impl<L> CusumFilter<L> {
    /// Create a filter with trigger threshold `h`.
    ///
    /// `h` is expected to be positive. A non-positive `h` is accepted and
    /// runs the same arithmetic, which then triggers at every position
    /// (the positive sum is always >= a non-positive threshold).
    pub fn new(series: ReturnSeries<L>, h: f64) -> Self {
        Self {
            series,
            threshold: h,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run the filter over the full series.
    ///
    /// Single pass: at each position `s_plus = max(0, s_plus + v)` and
    /// `s_minus = min(0, s_minus + v)`; a crossing by either sum records
    /// the position and resets both. The two triggers are mutually
    /// exclusive per position, so event indices are strictly increasing.
    pub fn filter(&self) -> CusumEvents<'_, L> {
        let mut s_plus = 0.0_f64;
        let mut s_minus = 0.0_f64;
        let mut indices = Vec::new();

        for (i, &v) in self.series.values().iter().enumerate() {
            s_plus = (s_plus + v).max(0.0);
            s_minus = (s_minus + v).min(0.0);

            if s_plus >= self.threshold {
                indices.push(i);
                s_plus = 0.0;
                s_minus = 0.0;
            } else if s_minus.abs() >= self.threshold {
                indices.push(i);
                s_plus = 0.0;
                s_minus = 0.0;
            }
        }

        CusumEvents {
            indices,
            series: &self.series,
        }
    }
}

/// Result of a CUSUM scan: the detected event positions, with access
/// back into the filtered series.
#[derive(Debug)]
pub struct CusumEvents<'a, L> {
    indices: Vec<usize>,
    series: &'a ReturnSeries<L>,
}

impl<L> CusumEvents<'_, L> {
    /// Positions of detected events, strictly increasing.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Series values at the detected event positions.
    pub fn values(&self) -> Vec<f64> {
        let data = self.series.values();
        self.indices.iter().map(|&i| data[i]).collect()
    }

    /// The original label sequence of the filtered series, if one was
    /// supplied at construction.
    pub fn labels(&self) -> SeriesResult<&[L]> {
        self.series.labels()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
