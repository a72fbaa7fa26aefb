pub mod data;
pub mod etf;
pub mod filters;
pub mod validation;

// Re-export commonly used types
pub use data::{PriceTable, ReturnSeries, SeriesError, TableError};
pub use etf::{EtfError, EtfTrick, EtfTrickFit, WeightNotice};
pub use filters::{CusumEvents, CusumFilter};
pub use validation::{EmbargoCv, Fold, SplitError, Splitter};
