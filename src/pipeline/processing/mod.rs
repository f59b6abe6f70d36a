// Pipeline processing: normalize -> validate -> filter -> aggregate

pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod validate;

pub use aggregate::{aggregate, SummaryReport, SummaryTable};
pub use filter::{filter, FilterOutcome, RowFilter};
pub use normalize::normalize;
pub use validate::{into_shipments, validate};
