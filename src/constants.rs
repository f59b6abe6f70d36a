/// Column and report name constants shared across the pipeline.
/// Column names are in their normalized (snake_case) form.

pub const NUM_STOPS: &str = "num_stops";
pub const MILESTONE_STATUS: &str = "milestone_status";
pub const OUT_OF_ORDER: &str = "out_of_order";
pub const ORIGIN_NAME: &str = "origin_name";
pub const CARRIER: &str = "carrier";

/// Columns every uploaded sheet must carry after normalization, in reporting order
pub const REQUIRED_COLUMNS: [&str; 5] = [NUM_STOPS, MILESTONE_STATUS, OUT_OF_ORDER, ORIGIN_NAME, CARRIER];

// Filter defaults
pub const EXCLUDED_STOP_COUNT: i64 = 2;
pub const NO_MILESTONE_UNDERSCORED: &str = "no_milestone_received";
pub const NO_MILESTONE_SPACED: &str = "no milestone received";

// Out-of-order categories
pub const YES: &str = "Yes";
pub const NO: &str = "No";

// Summary labels
pub const GRAND_TOTAL: &str = "Grand Total";
pub const PCT_OUT_OF_ORDER: &str = "% Out of Order";

// Report layout
pub const REPORT_FILE_NAME: &str = "shipment_summary_analysis.xlsx";
pub const REPORT_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const FILTERED_SHEET: &str = "Filtered_Data";
pub const SUMMARY_SHEET: &str = "Summary_Analysis";
pub const TABLE_SPACING: u32 = 4;
pub const PREVIEW_ROWS: usize = 10;
