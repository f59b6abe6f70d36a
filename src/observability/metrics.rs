//! Metrics for the shipment analyzer.
//!
//! Names follow Prometheus conventions. Recording is a no-op until a process
//! installs a `metrics` recorder.

use std::fmt;

/// Enum representing all metric names used in the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Pipeline
    PipelineRuns,
    PipelineFailures,
    PipelineDuration,

    // Ingestion
    IngestRowsRead,
    IngestBytesRead,
    IngestSchemaRejections,
    IngestUnparsedStopCounts,

    // Filter
    FilterRowsKept,
    FilterRowsExcluded,

    // Aggregation
    AggregateSummaryRows,

    // Report
    ReportBytesWritten,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::PipelineRuns => "shipment_pipeline_runs_total",
            MetricName::PipelineFailures => "shipment_pipeline_failures_total",
            MetricName::PipelineDuration => "shipment_pipeline_duration_seconds",

            MetricName::IngestRowsRead => "shipment_ingest_rows_read_total",
            MetricName::IngestBytesRead => "shipment_ingest_bytes",
            MetricName::IngestSchemaRejections => "shipment_ingest_schema_rejections_total",
            MetricName::IngestUnparsedStopCounts => "shipment_ingest_unparsed_stop_counts_total",

            MetricName::FilterRowsKept => "shipment_filter_rows_kept_total",
            MetricName::FilterRowsExcluded => "shipment_filter_rows_excluded_total",

            MetricName::AggregateSummaryRows => "shipment_aggregate_summary_rows",

            MetricName::ReportBytesWritten => "shipment_report_bytes",
        }
    }

    /// Get all metric names as an iterator
    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            PipelineRuns,
            PipelineFailures,
            PipelineDuration,
            IngestRowsRead,
            IngestBytesRead,
            IngestSchemaRejections,
            IngestUnparsedStopCounts,
            FilterRowsKept,
            FilterRowsExcluded,
            AggregateSummaryRows,
            ReportBytesWritten,
        ]
        .into_iter()
    }
}

pub mod pipeline {
    use super::MetricName;

    pub fn run_started() {
        ::metrics::counter!(MetricName::PipelineRuns.as_str()).increment(1);
    }

    pub fn run_failed(stage: &'static str) {
        ::metrics::counter!(MetricName::PipelineFailures.as_str(), "stage" => stage).increment(1);
    }

    pub fn run_duration(secs: f64) {
        ::metrics::histogram!(MetricName::PipelineDuration.as_str()).record(secs);
    }
}

pub mod ingest {
    use super::MetricName;

    pub fn rows_read(rows: usize, bytes: usize) {
        ::metrics::counter!(MetricName::IngestRowsRead.as_str()).increment(rows as u64);
        ::metrics::histogram!(MetricName::IngestBytesRead.as_str()).record(bytes as f64);
    }

    pub fn schema_rejected(missing: usize) {
        ::metrics::counter!(MetricName::IngestSchemaRejections.as_str()).increment(1);
        tracing::debug!(missing, "schema rejection recorded");
    }

    pub fn unparsed_stop_counts(count: usize) {
        ::metrics::counter!(MetricName::IngestUnparsedStopCounts.as_str()).increment(count as u64);
    }
}

pub mod filter {
    use super::MetricName;

    pub fn rows_kept(count: usize) {
        ::metrics::counter!(MetricName::FilterRowsKept.as_str()).increment(count as u64);
    }

    pub fn rows_excluded(reason: &'static str, count: usize) {
        ::metrics::counter!(MetricName::FilterRowsExcluded.as_str(), "reason" => reason).increment(count as u64);
    }
}

pub mod aggregate {
    use super::MetricName;

    pub fn summary_rows(summary: &'static str, rows: usize) {
        ::metrics::histogram!(MetricName::AggregateSummaryRows.as_str(), "summary" => summary).record(rows as f64);
    }
}

pub mod report {
    use super::MetricName;

    pub fn bytes_written(bytes: usize) {
        ::metrics::histogram!(MetricName::ReportBytesWritten.as_str()).record(bytes as f64);
    }
}
