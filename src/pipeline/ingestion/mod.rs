// Pipeline ingestion: turning an uploaded workbook into a raw table

use calamine::{Data, DataType, Reader, Xlsx};
use std::io::Cursor;
use tracing::{debug, info, instrument};

use crate::error::{AnalyzerError, Result};
use crate::observability::metrics::ingest as ingest_metrics;
use crate::types::{CellValue, RawTable};

/// Read the first worksheet of an `.xlsx` buffer. The first row is the header;
/// every following row becomes a data row padded to the header width.
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn read_workbook(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(AnalyzerError::NoWorksheet)??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| convert_cell(cell).to_string()).collect(),
        None => {
            debug!("First worksheet is empty");
            return Ok(RawTable::default());
        }
    };

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        // Trailing formatted-but-empty rows are not shipments
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    info!("📥 Read {} rows across {} columns", data.len(), columns.len());
    ingest_metrics::rows_read(data.len(), bytes.len());

    Ok(RawTable::new(columns, data))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match cell.as_datetime() {
            Some(naive) => CellValue::Text(naive.to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}
