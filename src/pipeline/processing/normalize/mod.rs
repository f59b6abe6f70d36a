use tracing::{debug, instrument};

use crate::types::RawTable;

/// Canonical form of a column label: trimmed, lowercased, spaces replaced by
/// underscores. Total over any input and idempotent.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Return a copy of `table` whose column labels are canonicalized. Cells are untouched.
#[instrument(skip(table), fields(columns = table.columns.len()))]
pub fn normalize(table: &RawTable) -> RawTable {
    let columns: Vec<String> = table.columns.iter().map(|c| normalize_label(c)).collect();

    for (before, after) in table.columns.iter().zip(&columns) {
        if before != after {
            debug!("Renamed column '{}' -> '{}'", before, after);
        }
    }

    RawTable {
        columns,
        rows: table.rows.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Num Stops "), "num_stops");
        assert_eq!(normalize_label("Milestone Status"), "milestone_status");
        assert_eq!(normalize_label("OUT_OF_ORDER"), "out_of_order");
        assert_eq!(normalize_label("origin name"), "origin_name");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_normalize_keeps_cells() {
        let table = RawTable::new(
            vec![" Carrier ".into(), "Num Stops".into()],
            vec![vec![CellValue::Text("ACME".into()), CellValue::Number(1.0)]],
        );

        let normalized = normalize(&table);
        assert_eq!(normalized.columns, vec!["carrier", "num_stops"]);
        assert_eq!(normalized.rows, table.rows);
        // Input is left as it was
        assert_eq!(table.columns[0], " Carrier ");
    }

    proptest! {
        #[test]
        fn normalizing_twice_equals_normalizing_once(labels in proptest::collection::vec(".{0,24}", 0..8)) {
            let table = RawTable::new(labels, Vec::new());
            let once = normalize(&table);
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
