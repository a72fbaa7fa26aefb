//! Return series container.
//!
//! A `ReturnSeries` holds a flat 1-D buffer of floating-point values
//! (typically log-returns), optionally paired with an ordered label
//! sequence of identical length.

use thiserror::Error;

use super::table::PriceTable;

#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("label index has {got} entries for {values} values")]
    LabelLengthMismatch { values: usize, got: usize },

    #[error("input table must have exactly one column, got {0}")]
    MultiColumn(usize),

    #[error("no label index was attached to the input")]
    MissingLabels,
}

pub type SeriesResult<T> = Result<T, SeriesError>;

/// An ordered sequence of floating-point values with an optional label
/// index (e.g. timestamps).
#[derive(Debug, Clone)]
pub struct ReturnSeries<L> {
    values: Vec<f64>,
    labels: Option<Vec<L>>,
}

impl<L> ReturnSeries<L> {
    /// Build an unlabeled series from raw values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            values,
            labels: None,
        }
    }

    /// Build a labeled series; labels must align one-to-one with values.
    pub fn from_labeled(labels: Vec<L>, values: Vec<f64>) -> SeriesResult<Self> {
        if labels.len() != values.len() {
            return Err(SeriesError::LabelLengthMismatch {
                values: values.len(),
                got: labels.len(),
            });
        }
        Ok(Self {
            values,
            labels: Some(labels),
        })
    }

    /// Adapt a single-column table into a series, keeping its row labels.
    ///
    /// Tables with more than one column are rejected.
    pub fn from_table(table: PriceTable<L>) -> SeriesResult<Self> {
        if table.n_cols() != 1 {
            return Err(SeriesError::MultiColumn(table.n_cols()));
        }
        let (values, labels) = table.into_single_column();
        Ok(Self { values, labels })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The label index, if the input carried one.
    pub fn labels(&self) -> SeriesResult<&[L]> {
        self.labels.as_deref().ok_or(SeriesError::MissingLabels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::PriceTable;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_raw_series_has_no_labels() {
        let series: ReturnSeries<NaiveDate> = ReturnSeries::from_values(vec![0.01, -0.02]);
        assert_eq!(series.len(), 2);
        assert!(matches!(
            series.labels().unwrap_err(),
            SeriesError::MissingLabels
        ));
    }

    #[test]
    fn test_labeled_series_alignment() {
        let series = ReturnSeries::from_labeled(vec![d(1), d(2)], vec![0.01, -0.02]).unwrap();
        assert_eq!(series.labels().unwrap(), &[d(1), d(2)]);

        let err = ReturnSeries::from_labeled(vec![d(1)], vec![0.01, -0.02]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LabelLengthMismatch { values: 2, got: 1 }
        ));
    }

    #[test]
    fn test_single_column_table_adapts() {
        let table =
            PriceTable::from_labeled(vec![d(1), d(2)], vec!["SPY".to_string()], vec![
                vec![0.01],
                vec![-0.02],
            ])
            .unwrap();
        let series = ReturnSeries::from_table(table).unwrap();
        assert_eq!(series.values(), &[0.01, -0.02]);
        assert_eq!(series.labels().unwrap(), &[d(1), d(2)]);
    }

    #[test]
    fn test_multi_column_table_rejected() {
        let table: PriceTable<NaiveDate> =
            PriceTable::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(matches!(
            ReturnSeries::from_table(table).unwrap_err(),
            SeriesError::MultiColumn(2)
        ));
    }
}
