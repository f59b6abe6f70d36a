//! Plain-text rendering for the terminal.

use crate::pipeline::processing::SummaryTable;
use crate::types::RawTable;

/// Group digits in threes: `1234567` -> `"1,234,567"`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render rows as a pipe-separated grid with padded columns
pub fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{:<w$}", cells.get(i).map(String::as_str).unwrap_or(""), w = *w))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut out = vec![line(header)];
    out.push(format!(
        "|{}|",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("|")
    ));
    out.extend(rows.iter().map(|r| line(r.as_slice())));
    out.join("\n")
}

pub fn render_raw_table(table: &RawTable) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    render_grid(&table.columns, &rows)
}

pub fn render_summary(summary: &SummaryTable) -> String {
    let rows: Vec<Vec<String>> = summary
        .all_rows()
        .map(|entry| {
            let mut cells = entry.key.clone();
            cells.extend(entry.counts.iter().map(u64::to_string));
            cells.push(entry.grand_total.to_string());
            if let Some(pct) = &entry.pct_out_of_order {
                cells.push(pct.clone());
            }
            cells
        })
        .collect();
    render_grid(&summary.header(), &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::aggregate::PivotCounts;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_render_summary() {
        let mut pivot = PivotCounts::with_columns(["No", "Yes"]);
        pivot.tally(vec!["SEA".into()], "Yes");
        let summary = pivot.into_summary("Origin Summary", &["origin_name"], Some("Yes"));

        let rendered = render_summary(&summary);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| origin_name | No | Yes | Grand Total | % Out of Order |");
        assert_eq!(lines[2], "| SEA         | 0  | 1   | 1           | 100%           |");
        assert!(lines[3].starts_with("| Grand Total |"));
    }
}
