//! Schema validation and record typing.
//!
//! This is the ingestion boundary: after a sheet passes [`validate`], each row is
//! converted into a [`ShipmentRecord`] once and no later stage looks columns up
//! by label.

use tracing::{info, instrument, warn};

use crate::constants::{self, REQUIRED_COLUMNS};
use crate::domain::{ShipmentRecord, ShipmentTable};
use crate::error::{AnalyzerError, Result};
use crate::observability::metrics::ingest as ingest_metrics;
use crate::types::{CellValue, RawTable};

/// Required columns absent from `table`, in the canonical required order.
/// Empty means the table is valid. Every missing column is reported.
pub fn validate(table: &RawTable) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| table.column_index(required).is_none())
        .map(|required| required.to_string())
        .collect()
}

/// Column positions of the required fields within a validated table
struct FieldIndex {
    num_stops: usize,
    milestone_status: usize,
    out_of_order: usize,
    origin_name: usize,
    carrier: usize,
}

impl FieldIndex {
    fn locate(table: &RawTable) -> Result<Self> {
        let missing = validate(table);
        if !missing.is_empty() {
            warn!("Rejecting sheet, missing columns: {}", missing.join(", "));
            ingest_metrics::schema_rejected(missing.len());
            return Err(AnalyzerError::Schema { missing });
        }

        let index = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            num_stops: index(constants::NUM_STOPS),
            milestone_status: index(constants::MILESTONE_STATUS),
            out_of_order: index(constants::OUT_OF_ORDER),
            origin_name: index(constants::ORIGIN_NAME),
            carrier: index(constants::CARRIER),
        })
    }
}

/// Validate a normalized table and convert every row into a typed record.
///
/// Fails with [`AnalyzerError::Schema`] naming all missing columns. A `num_stops`
/// cell that is not a whole number is kept as `None` and logged.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn into_shipments(table: &RawTable) -> Result<ShipmentTable> {
    let fields = FieldIndex::locate(table)?;

    let mut unparsed_stops = 0usize;
    let records: Vec<ShipmentRecord> = table
        .rows
        .iter()
        .map(|row| {
            // Rows built by hand may be narrower than the header
            let mut cells = row.clone();
            if cells.len() < table.columns.len() {
                cells.resize(table.columns.len(), CellValue::Empty);
            }

            let stops_cell = &cells[fields.num_stops];
            let num_stops = stops_cell.as_integer();
            if num_stops.is_none() && !stops_cell.is_empty() {
                unparsed_stops += 1;
            }

            ShipmentRecord {
                num_stops,
                milestone_status: cells[fields.milestone_status].as_text(),
                out_of_order: cells[fields.out_of_order].as_text(),
                origin_name: cells[fields.origin_name].as_text(),
                carrier: cells[fields.carrier].as_text(),
                cells,
            }
        })
        .collect();

    if unparsed_stops > 0 {
        warn!("{} rows have a num_stops value that is not a whole number", unparsed_stops);
        ingest_metrics::unparsed_stop_counts(unparsed_stops);
    }
    info!("✅ Typed {} shipment records", records.len());

    Ok(ShipmentTable::new(table.columns.clone(), records))
}
