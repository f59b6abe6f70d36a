pub mod config;
pub mod constants;
pub mod display;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod types;

pub use config::{AnalyzerConfig, FilterRules, ReportConfig};
pub use domain::{ShipmentRecord, ShipmentTable};
pub use error::{AnalyzerError, Result};
pub use pipeline::ingestion::read_workbook;
pub use pipeline::processing::aggregate::{
    aggregate, format_percentage, SummaryReport, SummaryRow, SummaryTable,
};
pub use pipeline::processing::filter::{filter, FilterOutcome, RowFilter};
pub use pipeline::processing::normalize::normalize;
pub use pipeline::processing::validate::{into_shipments, validate};
pub use pipeline::report::{write_report, ReportWriter};
pub use pipeline::{PipelineOutcome, PipelineWarning, ShipmentPipeline};
pub use types::{CellValue, RawTable};
