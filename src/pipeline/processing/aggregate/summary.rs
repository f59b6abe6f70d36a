use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::percent::format_percentage;
use crate::constants::{GRAND_TOTAL, PCT_OUT_OF_ORDER};

/// One row of a summary: its key tuple, a count per column and the row total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: Vec<String>,
    pub counts: Vec<u64>,
    pub grand_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_out_of_order: Option<String>,
}

/// A pivoted count table with a Grand Total column and row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub title: String,
    /// Labels of the key dimensions, one per element of each row key
    pub index_names: Vec<String>,
    /// Count columns in display order, excluding Grand Total
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
    pub grand_total: SummaryRow,
}

impl SummaryTable {
    pub fn has_percentage(&self) -> bool {
        self.grand_total.pct_out_of_order.is_some()
    }

    /// Header labels as written to the report
    pub fn header(&self) -> Vec<String> {
        let mut header = self.index_names.clone();
        header.extend(self.columns.iter().cloned());
        header.push(GRAND_TOTAL.to_string());
        if self.has_percentage() {
            header.push(PCT_OUT_OF_ORDER.to_string());
        }
        header
    }

    /// Data rows followed by the Grand Total row
    pub fn all_rows(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().chain(std::iter::once(&self.grand_total))
    }

    /// Rows below the header, Grand Total included
    pub fn body_len(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn row(&self, key: &[&str]) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.key.iter().map(String::as_str).eq(key.iter().copied()))
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Count at (`key`, `column`); 0 for a known column the key never hit
    pub fn count(&self, key: &[&str], column: &str) -> Option<u64> {
        let idx = self.column_index(column)?;
        self.row(key).map(|r| r.counts[idx])
    }
}

/// Order labels the way a spreadsheet sorts them: numeric labels by value and
/// ahead of text, text labels lexicographically.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let number = |s: &str| s.trim().parse::<f64>().ok().filter(|n| n.is_finite());
    match (number(a), number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn natural_key_cmp(a: &[String], b: &[String]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| natural_cmp(x, y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Accumulates counts keyed by (row key, column) before they are laid out
#[derive(Debug, Default)]
pub struct PivotCounts {
    cells: BTreeMap<Vec<String>, BTreeMap<String, u64>>,
    columns: BTreeSet<String>,
}

impl PivotCounts {
    /// Start with columns that must appear even when nothing is counted in them
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: BTreeMap::new(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tally(&mut self, key: Vec<String>, column: &str) {
        self.columns.insert(column.to_string());
        *self.cells.entry(key).or_default().entry(column.to_string()).or_insert(0) += 1;
    }

    /// Lay the counts out as a table. Rows and columns come out in natural order and
    /// absent combinations are 0. When `percentage_of` names a column, every row gets
    /// a `% Out of Order` of that column over its total; the Grand Total row's value is
    /// computed from the summed counts.
    pub fn into_summary(self, title: &str, index_names: &[&str], percentage_of: Option<&str>) -> SummaryTable {
        let mut columns: Vec<String> = self.columns.into_iter().collect();
        columns.sort_by(|a, b| natural_cmp(a, b));
        let pct_column = percentage_of.and_then(|c| columns.iter().position(|col| col == c));
        let percentage = |counts: &[u64], total: u64| {
            percentage_of.map(|_| format_percentage(pct_column.map_or(0, |i| counts[i]), total))
        };

        let mut rows: Vec<SummaryRow> = self
            .cells
            .into_iter()
            .map(|(key, cells)| {
                let counts: Vec<u64> = columns.iter().map(|c| cells.get(c).copied().unwrap_or(0)).collect();
                let grand_total = counts.iter().sum();
                SummaryRow {
                    pct_out_of_order: percentage(&counts, grand_total),
                    key,
                    counts,
                    grand_total,
                }
            })
            .collect();
        rows.sort_by(|a, b| natural_key_cmp(&a.key, &b.key));

        let column_sums: Vec<u64> = (0..columns.len())
            .map(|i| rows.iter().map(|r| r.counts[i]).sum())
            .collect();
        let total: u64 = column_sums.iter().sum();

        let mut total_key = vec![GRAND_TOTAL.to_string()];
        total_key.resize(index_names.len().max(1), String::new());

        let grand_total = SummaryRow {
            pct_out_of_order: percentage(&column_sums, total),
            key: total_key,
            counts: column_sums,
            grand_total: total,
        };

        SummaryTable {
            title: title.to_string(),
            index_names: index_names.iter().map(|s| s.to_string()).collect(),
            columns,
            rows,
            grand_total,
        }
    }
}
