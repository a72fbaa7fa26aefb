//! Input containers shared by the toolkit components.
//!
//! Every component accepts either a raw numeric buffer or a labeled
//! variant; both collapse into a single internal representation
//! (flat values + optional parallel label buffer) at construction.

pub mod series;
pub mod table;

pub use series::{ReturnSeries, SeriesError, SeriesResult};
pub use table::{PriceTable, TableError, TableResult};
