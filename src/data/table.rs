//! Price matrix container.
//!
//! A `PriceTable` holds a (T rows × N assets) matrix of price levels in a
//! flat row-major buffer, optionally paired with row labels (timestamps)
//! and column names (asset identifiers).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("price matrix must contain at least one row and one column")]
    Empty,

    #[error("row {row} has {got} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("non-finite price at row {row}, column {col}")]
    NonFinite { row: usize, col: usize },

    #[error("row label index has {got} entries for {expected} rows")]
    LabelLengthMismatch { expected: usize, got: usize },

    #[error("{got} column names for {expected} columns")]
    ColumnNameMismatch { expected: usize, got: usize },

    #[error("no row label index was attached to the input")]
    MissingLabels,

    #[error("no column names were attached to the input")]
    MissingColumns,
}

pub type TableResult<T> = Result<T, TableError>;

/// A (T × N) matrix of price levels with optional row/column labels.
///
/// Rows are time steps, columns are assets. All entries are validated
/// to be finite at construction.
#[derive(Debug, Clone)]
pub struct PriceTable<L> {
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
    row_labels: Option<Vec<L>>,
    columns: Option<Vec<String>>,
}

impl<L> PriceTable<L> {
    /// Build an unlabeled table from nested rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> TableResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        if n_rows == 0 || n_cols == 0 {
            return Err(TableError::Empty);
        }

        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (row, row_values) in rows.iter().enumerate() {
            if row_values.len() != n_cols {
                return Err(TableError::RaggedRows {
                    row,
                    expected: n_cols,
                    got: row_values.len(),
                });
            }
            for (col, &v) in row_values.iter().enumerate() {
                if !v.is_finite() {
                    return Err(TableError::NonFinite { row, col });
                }
                values.push(v);
            }
        }

        Ok(Self {
            values,
            n_rows,
            n_cols,
            row_labels: None,
            columns: None,
        })
    }

    /// Build a labeled table: row labels (one per time step) and column
    /// names (one per asset).
    pub fn from_labeled(
        row_labels: Vec<L>,
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> TableResult<Self> {
        let mut table = Self::from_rows(rows)?;
        if row_labels.len() != table.n_rows {
            return Err(TableError::LabelLengthMismatch {
                expected: table.n_rows,
                got: row_labels.len(),
            });
        }
        if columns.len() != table.n_cols {
            return Err(TableError::ColumnNameMismatch {
                expected: table.n_cols,
                got: columns.len(),
            });
        }
        table.row_labels = Some(row_labels);
        table.columns = Some(columns);
        Ok(table)
    }

    /// Number of time steps.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of asset columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// One time step's prices across all assets.
    pub fn row(&self, t: usize) -> &[f64] {
        &self.values[t * self.n_cols..(t + 1) * self.n_cols]
    }

    /// A single price level.
    pub fn value(&self, t: usize, n: usize) -> f64 {
        self.values[t * self.n_cols + n]
    }

    /// Row labels, if the input carried them.
    pub fn row_labels(&self) -> TableResult<&[L]> {
        self.row_labels
            .as_deref()
            .ok_or(TableError::MissingLabels)
    }

    /// Column names, if the input carried them.
    pub fn columns(&self) -> TableResult<&[String]> {
        self.columns.as_deref().ok_or(TableError::MissingColumns)
    }

    /// Tear down a single-column table into its values and row labels.
    ///
    /// Caller must have checked `n_cols == 1`.
    pub(crate) fn into_single_column(self) -> (Vec<f64>, Option<Vec<L>>) {
        debug_assert_eq!(self.n_cols, 1);
        (self.values, self.row_labels)
    }
}
