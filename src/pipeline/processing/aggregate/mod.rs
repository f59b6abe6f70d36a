//! Grouped-count summaries over the filtered shipments.
//!
//! Each summary is independent of the others and only reads the typed record
//! fields. Rows with a blank grouping key are left out of that summary.

pub mod percent;
pub mod summary;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::constants::{CARRIER, MILESTONE_STATUS, NO, ORIGIN_NAME, OUT_OF_ORDER, YES};
use crate::domain::ShipmentTable;
use crate::observability::metrics::aggregate as aggregate_metrics;

pub use percent::format_percentage;
pub use summary::{PivotCounts, SummaryRow, SummaryTable};

pub const OUT_OF_ORDER_TITLE: &str = "Out-of-Order Summary";
pub const ORIGIN_TITLE: &str = "Origin Summary";
pub const CARRIER_TITLE: &str = "Carrier Summary";

/// The three summaries, in report order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub out_of_order: SummaryTable,
    pub origin: SummaryTable,
    pub carrier: SummaryTable,
}

impl SummaryReport {
    pub fn tables(&self) -> [&SummaryTable; 3] {
        [&self.out_of_order, &self.origin, &self.carrier]
    }
}

/// Out-of-order flag by milestone status
pub fn out_of_order_summary(table: &ShipmentTable) -> SummaryTable {
    let mut pivot = PivotCounts::default();
    for record in &table.records {
        if let (Some(flag), Some(milestone)) = (&record.out_of_order, &record.milestone_status) {
            pivot.tally(vec![flag.clone()], milestone);
        }
    }
    pivot.into_summary(OUT_OF_ORDER_TITLE, &[OUT_OF_ORDER], None)
}

/// Out-of-order counts and rate per origin
pub fn origin_summary(table: &ShipmentTable) -> SummaryTable {
    let mut pivot = PivotCounts::with_columns([NO, YES]);
    for record in &table.records {
        if let (Some(origin), Some(flag)) = (&record.origin_name, &record.out_of_order) {
            pivot.tally(vec![origin.clone()], flag);
        }
    }
    pivot.into_summary(ORIGIN_TITLE, &[ORIGIN_NAME], Some(YES))
}

/// Out-of-order counts and rate per (carrier, origin)
pub fn carrier_summary(table: &ShipmentTable) -> SummaryTable {
    let mut pivot = PivotCounts::with_columns([NO, YES]);
    for record in &table.records {
        if let (Some(carrier), Some(origin), Some(flag)) =
            (&record.carrier, &record.origin_name, &record.out_of_order)
        {
            pivot.tally(vec![carrier.clone(), origin.clone()], flag);
        }
    }
    pivot.into_summary(CARRIER_TITLE, &[CARRIER, ORIGIN_NAME], Some(YES))
}

/// Build all three summaries from the filtered shipments
#[instrument(skip(table), fields(rows = table.len()))]
pub fn aggregate(table: &ShipmentTable) -> SummaryReport {
    let report = SummaryReport {
        out_of_order: out_of_order_summary(table),
        origin: origin_summary(table),
        carrier: carrier_summary(table),
    };

    for summary in report.tables() {
        debug!(
            "{}: {} rows, grand total {}",
            summary.title,
            summary.rows.len(),
            summary.grand_total.grand_total
        );
    }
    aggregate_metrics::summary_rows("out_of_order", report.out_of_order.rows.len());
    aggregate_metrics::summary_rows("origin", report.origin.rows.len());
    aggregate_metrics::summary_rows("carrier", report.carrier.rows.len());

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipmentRecord;
    use proptest::prelude::*;

    fn shipment(flag: &str, milestone: &str, origin: &str, carrier: &str) -> ShipmentRecord {
        ShipmentRecord {
            num_stops: Some(1),
            milestone_status: Some(milestone.to_string()),
            out_of_order: Some(flag.to_string()),
            origin_name: Some(origin.to_string()),
            carrier: Some(carrier.to_string()),
            cells: Vec::new(),
        }
    }

    fn table(records: Vec<ShipmentRecord>) -> ShipmentTable {
        ShipmentTable::new(Vec::new(), records)
    }

    fn two_origins() -> ShipmentTable {
        table(vec![
            shipment("Yes", "Delivered", "A", "ACME"),
            shipment("Yes", "Delivered", "A", "ACME"),
            shipment("Yes", "In Transit", "A", "ZIP"),
            shipment("No", "Delivered", "A", "ZIP"),
            shipment("No", "Delivered", "B", "ACME"),
            shipment("No", "In Transit", "B", "ACME"),
        ])
    }

    #[test]
    fn test_origin_percentages() {
        let origin = origin_summary(&two_origins());

        let a = origin.row(&["A"]).unwrap();
        assert_eq!(a.counts, vec![1, 3]);
        assert_eq!(a.grand_total, 4);
        assert_eq!(a.pct_out_of_order.as_deref(), Some("75%"));

        let b = origin.row(&["B"]).unwrap();
        assert_eq!(b.counts, vec![2, 0]);
        assert_eq!(b.pct_out_of_order.as_deref(), Some("0%"));

        assert_eq!(origin.grand_total.counts, vec![3, 3]);
        assert_eq!(origin.grand_total.grand_total, 6);
        assert_eq!(origin.grand_total.pct_out_of_order.as_deref(), Some("50%"));
    }

    #[test]
    fn test_grand_total_percentage_is_not_an_average() {
        // Per-origin rates of 100% and 10% average to 55%, the pooled rate is 18%
        let mut records = vec![shipment("Yes", "Delivered", "A", "ACME")];
        records.push(shipment("Yes", "Delivered", "B", "ACME"));
        for _ in 0..9 {
            records.push(shipment("No", "Delivered", "B", "ACME"));
        }

        let origin = origin_summary(&table(records));
        assert_eq!(origin.row(&["A"]).unwrap().pct_out_of_order.as_deref(), Some("100%"));
        assert_eq!(origin.row(&["B"]).unwrap().pct_out_of_order.as_deref(), Some("10%"));
        assert_eq!(origin.grand_total.pct_out_of_order.as_deref(), Some("18%"));
    }

    #[test]
    fn test_out_of_order_summary_layout() {
        let summary = out_of_order_summary(&two_origins());

        assert_eq!(summary.index_names, vec!["out_of_order"]);
        assert_eq!(summary.columns, vec!["Delivered", "In Transit"]);
        assert_eq!(summary.rows.iter().map(|r| r.key[0].as_str()).collect::<Vec<_>>(), vec!["No", "Yes"]);
        assert_eq!(summary.count(&["Yes"], "Delivered"), Some(2));
        assert_eq!(summary.count(&["No"], "In Transit"), Some(1));
        assert_eq!(summary.grand_total.counts, vec![4, 2]);
        assert_eq!(summary.grand_total.grand_total, 6);
        assert!(!summary.has_percentage());
    }

    #[test]
    fn test_carrier_summary_uses_composite_key() {
        let carrier = carrier_summary(&two_origins());

        let keys: Vec<Vec<String>> = carrier.rows.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                vec!["ACME".to_string(), "A".to_string()],
                vec!["ACME".to_string(), "B".to_string()],
                vec!["ZIP".to_string(), "A".to_string()],
            ]
        );
        let zip_a = carrier.row(&["ZIP", "A"]).unwrap();
        assert_eq!(zip_a.counts, vec![1, 1]);
        assert_eq!(zip_a.pct_out_of_order.as_deref(), Some("50%"));
        assert_eq!(carrier.grand_total.key, vec!["Grand Total", ""]);
        assert_eq!(carrier.grand_total.pct_out_of_order.as_deref(), Some("50%"));
    }

    #[test]
    fn test_unexpected_flag_values_get_their_own_column() {
        let records = vec![
            shipment("Yes", "Delivered", "A", "ACME"),
            shipment("Unknown", "Delivered", "A", "ACME"),
        ];
        let origin = origin_summary(&table(records));

        assert_eq!(origin.columns, vec!["No", "Unknown", "Yes"]);
        let a = origin.row(&["A"]).unwrap();
        assert_eq!(a.grand_total, 2);
        assert_eq!(a.pct_out_of_order.as_deref(), Some("50%"));
    }

    #[test]
    fn test_blank_keys_are_left_out() {
        let mut blank = shipment("Yes", "Delivered", "A", "ACME");
        blank.origin_name = None;
        let records = vec![shipment("No", "Delivered", "A", "ACME"), blank];

        let report = aggregate(&table(records));
        assert_eq!(report.out_of_order.grand_total.grand_total, 2);
        assert_eq!(report.origin.grand_total.grand_total, 1);
        assert_eq!(report.carrier.grand_total.grand_total, 1);
    }

    #[test]
    fn test_empty_input_gives_well_formed_summaries() {
        let report = aggregate(&table(Vec::new()));

        for summary in report.tables() {
            assert!(summary.rows.is_empty());
            assert_eq!(summary.grand_total.grand_total, 0);
        }
        assert!(report.out_of_order.columns.is_empty());
        assert_eq!(report.origin.columns, vec!["No", "Yes"]);
        assert_eq!(report.origin.grand_total.pct_out_of_order.as_deref(), Some("0%"));
        assert_eq!(report.carrier.grand_total.pct_out_of_order.as_deref(), Some("0%"));
    }

    fn record_strategy() -> impl Strategy<Value = ShipmentRecord> {
        (
            prop_oneof![Just("Yes"), Just("No")],
            prop_oneof![Just("Delivered"), Just("In Transit"), Just("Picked Up")],
            prop_oneof![Just("SEA"), Just("PDX"), Just("LAX")],
            prop_oneof![Just("ACME"), Just("ZIP")],
        )
            .prop_map(|(flag, milestone, origin, carrier)| shipment(flag, milestone, origin, carrier))
    }

    proptest! {
        #[test]
        fn grand_totals_equal_cell_sums(records in proptest::collection::vec(record_strategy(), 0..60)) {
            let input = table(records);
            let report = aggregate(&input);

            for summary in report.tables() {
                let cell_sum: u64 = summary.rows.iter().flat_map(|r| r.counts.iter()).sum();
                prop_assert_eq!(summary.grand_total.grand_total, cell_sum);
                for row in summary.all_rows() {
                    prop_assert_eq!(row.grand_total, row.counts.iter().sum::<u64>());
                }
            }
            prop_assert_eq!(report.out_of_order.grand_total.grand_total, input.len() as u64);

            let yes = report.origin.column_index("Yes").unwrap();
            let expected = format_percentage(report.origin.grand_total.counts[yes], report.origin.grand_total.grand_total);
            prop_assert_eq!(report.origin.grand_total.pct_out_of_order.clone(), Some(expected));
        }
    }
}
