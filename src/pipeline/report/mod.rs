//! Excel report writer.
//!
//! Generates one in-memory XLSX workbook with two sheets:
//! - Filtered_Data: the filtered shipments, header row, no index column
//! - Summary_Analysis: the three summaries stacked vertically
//!
//! ```text
//! Sheet: Summary_Analysis
//! | out_of_order | Delivered | In Transit | Grand Total |
//! | No           | 2         | 1          | 3           |
//! | Yes          | 2         | 1          | 3           |
//! | Grand Total  | 4         | 2          | 6           |
//! (blank rows)
//! | origin_name  | No | Yes | Grand Total | % Out of Order |
//! ...
//! ```

use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use tracing::{info, instrument};

use crate::config::ReportConfig;
use crate::domain::ShipmentTable;
use crate::error::Result;
use crate::observability::metrics::report as report_metrics;
use crate::pipeline::processing::aggregate::{SummaryReport, SummaryTable};
use crate::types::CellValue;

/// Writes the filtered data and summaries into a single workbook buffer
#[derive(Clone, Debug, Default)]
pub struct ReportWriter {
    layout: ReportConfig,
}

impl ReportWriter {
    pub fn new(layout: ReportConfig) -> Self {
        Self { layout }
    }

    /// First row of each summary on the summary sheet. Each table starts after the
    /// previous table's body rows plus `table_spacing`.
    pub fn summary_offsets(&self, summaries: &SummaryReport) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(3);
        let mut next = 0u32;
        for table in summaries.tables() {
            offsets.push(next);
            next = next.saturating_add(row(table.body_len())).saturating_add(self.layout.table_spacing);
        }
        offsets
    }

    #[instrument(skip(self, table, summaries), fields(rows = table.len()))]
    pub fn write(&self, table: &ShipmentTable, summaries: &SummaryReport) -> Result<Vec<u8>> {
        let header_fmt = Format::new().set_bold().set_border(FormatBorder::Thin);

        let mut data_sheet = Worksheet::new();
        data_sheet.set_name(&self.layout.filtered_sheet)?;
        write_filtered_data(&mut data_sheet, table, &header_fmt)?;

        let mut summary_sheet = Worksheet::new();
        summary_sheet.set_name(&self.layout.summary_sheet)?;
        for (summary, start) in summaries.tables().into_iter().zip(self.summary_offsets(summaries)) {
            write_summary(&mut summary_sheet, summary, start, &header_fmt)?;
        }
        summary_sheet.autofit();

        let mut workbook = Workbook::new();
        workbook.push_worksheet(data_sheet);
        workbook.push_worksheet(summary_sheet);
        let bytes = workbook.save_to_buffer()?;

        info!("📄 Report written ({} bytes)", bytes.len());
        report_metrics::bytes_written(bytes.len());
        Ok(bytes)
    }
}

/// Serialize the filtered shipments and summaries with the default layout
pub fn write_report(table: &ShipmentTable, summaries: &SummaryReport) -> Result<Vec<u8>> {
    ReportWriter::default().write(table, summaries)
}

fn write_filtered_data(sheet: &mut Worksheet, table: &ShipmentTable, header_fmt: &Format) -> Result<()> {
    for (c, label) in table.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col(c), label, header_fmt)?;
    }

    for (r, record) in table.records.iter().enumerate() {
        let target = row(r + 1);
        for (c, cell) in record.cells.iter().enumerate() {
            match cell {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    sheet.write_number(target, col(c), *n)?;
                }
                CellValue::Text(s) if s.is_empty() => {}
                CellValue::Text(s) => {
                    sheet.write_string(target, col(c), s)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(target, col(c), *b)?;
                }
            }
        }
    }
    Ok(())
}

/// Write one summary with its header row at `start`
fn write_summary(sheet: &mut Worksheet, summary: &SummaryTable, start: u32, header_fmt: &Format) -> Result<()> {
    for (c, label) in summary.header().iter().enumerate() {
        sheet.write_string_with_format(start, col(c), label, header_fmt)?;
    }

    let key_width = summary.index_names.len();
    let mut target = start;
    for entry in summary.all_rows() {
        target += 1;
        for (c, part) in entry.key.iter().enumerate() {
            if !part.is_empty() {
                sheet.write_string_with_format(target, col(c), part, header_fmt)?;
            }
        }
        for (c, count) in entry.counts.iter().enumerate() {
            sheet.write_number(target, col(key_width + c), *count as f64)?;
        }
        let total_col = key_width + entry.counts.len();
        sheet.write_number(target, col(total_col), entry.grand_total as f64)?;
        if let Some(pct) = &entry.pct_out_of_order {
            sheet.write_string(target, col(total_col + 1), pct)?;
        }
    }
    Ok(())
}

// Out-of-range positions saturate so the writer reports the error
fn row(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn col(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipmentRecord;
    use crate::pipeline::processing::aggregate::aggregate;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn shipment(flag: &str, origin: &str) -> ShipmentRecord {
        ShipmentRecord {
            num_stops: Some(1),
            milestone_status: Some("Delivered".into()),
            out_of_order: Some(flag.into()),
            origin_name: Some(origin.into()),
            carrier: Some("ACME".into()),
            cells: vec![
                CellValue::Number(1.0),
                CellValue::Text("Delivered".into()),
                CellValue::Text(flag.into()),
                CellValue::Text(origin.into()),
                CellValue::Text("ACME".into()),
            ],
        }
    }

    fn sample() -> ShipmentTable {
        ShipmentTable::new(
            vec![
                "num_stops".into(),
                "milestone_status".into(),
                "out_of_order".into(),
                "origin_name".into(),
                "carrier".into(),
            ],
            vec![shipment("Yes", "SEA"), shipment("No", "SEA"), shipment("No", "PDX")],
        )
    }

    #[test]
    fn test_offsets_stack_tables_without_overlap() {
        let summaries = aggregate(&sample());
        let offsets = ReportWriter::default().summary_offsets(&summaries);

        // out_of_order: 2 data rows + Grand Total
        // origin: 2 data rows + Grand Total
        assert_eq!(offsets, vec![0, 3 + 4, 3 + 4 + 3 + 4]);
        for (i, table) in summaries.tables().iter().enumerate().skip(1) {
            let previous_end = offsets[i - 1] + summaries.tables()[i - 1].body_len() as u32;
            assert!(offsets[i] > previous_end, "{} overlaps its predecessor", table.title);
        }
    }

    #[test]
    fn test_custom_spacing() {
        let summaries = aggregate(&sample());
        let writer = ReportWriter::new(ReportConfig {
            table_spacing: 2,
            ..ReportConfig::default()
        });
        assert_eq!(writer.summary_offsets(&summaries), vec![0, 5, 10]);
    }

    #[test]
    fn test_report_has_both_sheets_in_order() {
        let table = sample();
        let bytes = write_report(&table, &aggregate(&table)).unwrap();

        let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Filtered_Data", "Summary_Analysis"]);
    }

    #[test]
    fn test_filtered_sheet_has_header_and_rows() {
        let table = sample();
        let bytes = write_report(&table, &aggregate(&table)).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Filtered_Data").unwrap();
        assert_eq!(range.get_size(), (4, 5));
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("num_stops".into())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::Float(1.0)));
        assert_eq!(range.get_value((3, 3)), Some(&Data::String("PDX".into())));
    }

    #[test]
    fn test_empty_table_still_writes_report() {
        let table = ShipmentTable::new(vec!["num_stops".into()], Vec::new());
        let bytes = write_report(&table, &aggregate(&table)).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Summary_Analysis").unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("out_of_order".into())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("Grand Total".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(0.0)));
    }
}
