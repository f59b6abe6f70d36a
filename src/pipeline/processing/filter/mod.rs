use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::FilterRules;
use crate::domain::{ShipmentRecord, ShipmentTable};
use crate::observability::metrics::filter as filter_metrics;

/// Why a shipment was left out of the working dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExclusionReason {
    StopCount,
    NoMilestone,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::StopCount => "stop_count",
            ExclusionReason::NoMilestone => "no_milestone",
        }
    }
}

/// Filtered table plus the row counts shown to the user
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub table: ShipmentTable,
    pub before: usize,
    pub after: usize,
}

impl FilterOutcome {
    pub fn excluded(&self) -> usize {
        self.before - self.after
    }
}

/// Applies [`FilterRules`] to shipment records
#[derive(Debug, Clone)]
pub struct RowFilter {
    excluded_stop_count: i64,
    // Case-folded once up front
    excluded_milestones: Vec<String>,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self::new(&FilterRules::default())
    }
}

impl RowFilter {
    pub fn new(rules: &FilterRules) -> Self {
        Self {
            excluded_stop_count: rules.excluded_stop_count,
            excluded_milestones: rules
                .excluded_milestones
                .iter()
                .map(|m| m.trim().to_lowercase())
                .collect(),
        }
    }

    /// First rule that disqualifies `record`, if any. Blank cells never disqualify.
    pub fn exclusion(&self, record: &ShipmentRecord) -> Option<ExclusionReason> {
        if record.num_stops == Some(self.excluded_stop_count) {
            return Some(ExclusionReason::StopCount);
        }
        let milestone = record.milestone_status.as_deref()?.trim().to_lowercase();
        if self.excluded_milestones.iter().any(|m| *m == milestone) {
            return Some(ExclusionReason::NoMilestone);
        }
        None
    }

    /// Keep the records no rule disqualifies, preserving input order
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub fn apply(&self, table: &ShipmentTable) -> FilterOutcome {
        let mut stop_count = 0usize;
        let mut no_milestone = 0usize;

        let filtered = table.retain_cloned(|record| match self.exclusion(record) {
            Some(ExclusionReason::StopCount) => {
                stop_count += 1;
                false
            }
            Some(ExclusionReason::NoMilestone) => {
                no_milestone += 1;
                false
            }
            None => true,
        });

        filter_metrics::rows_excluded(ExclusionReason::StopCount.as_str(), stop_count);
        filter_metrics::rows_excluded(ExclusionReason::NoMilestone.as_str(), no_milestone);
        filter_metrics::rows_kept(filtered.len());

        info!(
            "🔧 Filtered {} -> {} shipments ({} by stop count, {} without milestone)",
            table.len(),
            filtered.len(),
            stop_count,
            no_milestone
        );
        if filtered.is_empty() && !table.is_empty() {
            warn!("Every shipment was excluded by the filter");
        }

        FilterOutcome {
            before: table.len(),
            after: filtered.len(),
            table: filtered,
        }
    }
}

/// Filter with the default rules: drop two-stop shipments and shipments with no
/// milestone received (either spelling, any case).
pub fn filter(table: &ShipmentTable) -> FilterOutcome {
    RowFilter::default().apply(table)
}
