// Shipment pipeline: ingestion, processing, and report output

pub mod ingestion;
pub mod processing;
pub mod report;

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::config::AnalyzerConfig;
use crate::constants;
use crate::domain::ShipmentTable;
use crate::error::{AnalyzerError, Result};
use crate::observability::metrics::pipeline as pipeline_metrics;
use crate::types::RawTable;

use self::processing::{normalize, validate, RowFilter, SummaryReport};
use self::report::ReportWriter;

/// Conditions worth telling the user about that do not stop the run
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum PipelineWarning {
    #[error("Filtering removed all {before} shipments; summaries are empty")]
    EmptyResult { before: usize },
}

/// Everything one run produces
#[derive(Debug, Serialize)]
pub struct PipelineOutcome {
    /// First rows of the upload, before normalization
    #[serde(skip)]
    pub preview: RawTable,
    pub before: usize,
    pub after: usize,
    pub summaries: SummaryReport,
    pub warnings: Vec<PipelineWarning>,
    #[serde(skip)]
    pub filtered: ShipmentTable,
    /// The finished workbook
    #[serde(skip)]
    pub report: Vec<u8>,
    pub report_file_name: String,
    pub report_mime_type: &'static str,
}

/// Runs one upload through every stage. Holds only configuration, so separate
/// runs never share tables or summaries.
pub struct ShipmentPipeline {
    config: AnalyzerConfig,
}

impl Default for ShipmentPipeline {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl ShipmentPipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Missing required columns of an upload, without running the rest of the pipeline
    pub fn check_schema(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let raw = ingestion::read_workbook(bytes)?;
        Ok(validate(&normalize(&raw)))
    }

    /// Run the full pipeline over an `.xlsx` buffer
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn run(&self, bytes: &[u8]) -> Result<PipelineOutcome> {
        info!("🚀 Starting shipment pipeline");
        pipeline_metrics::run_started();
        let started = Instant::now();

        let result = self.run_stages(bytes);

        pipeline_metrics::run_duration(started.elapsed().as_secs_f64());
        match &result {
            Ok(outcome) => info!(
                "✅ Pipeline finished: {} -> {} shipments in {:.3}s",
                outcome.before,
                outcome.after,
                started.elapsed().as_secs_f64()
            ),
            Err(e) => error!("Pipeline failed: {}", e),
        }
        result
    }

    /// Read `path` and run the pipeline over its contents
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<PipelineOutcome> {
        let bytes = fs::read(path.as_ref())?;
        self.run(&bytes)
    }

    fn run_stages(&self, bytes: &[u8]) -> Result<PipelineOutcome> {
        // Step 1: Read the upload
        let raw = ingestion::read_workbook(bytes).inspect_err(|_| pipeline_metrics::run_failed("ingest"))?;
        let preview = raw.head(self.config.preview_rows);

        // Step 2: Normalize labels and type the rows
        let normalized = normalize(&raw);
        let shipments = processing::into_shipments(&normalized).inspect_err(|e| {
            if matches!(e, AnalyzerError::Schema { .. }) {
                pipeline_metrics::run_failed("schema");
            }
        })?;

        // Step 3: Drop disqualified shipments
        let filtered = RowFilter::new(&self.config.filter).apply(&shipments);
        let mut warnings = Vec::new();
        if filtered.after == 0 {
            let warning = PipelineWarning::EmptyResult { before: filtered.before };
            warn!("{}", warning);
            warnings.push(warning);
        }

        // Step 4: Summaries
        let summaries = processing::aggregate(&filtered.table);

        // Step 5: Report
        let report = ReportWriter::new(self.config.report.clone())
            .write(&filtered.table, &summaries)
            .inspect_err(|_| pipeline_metrics::run_failed("report"))?;

        Ok(PipelineOutcome {
            preview,
            before: filtered.before,
            after: filtered.after,
            summaries,
            warnings,
            filtered: filtered.table,
            report,
            report_file_name: self.config.report.file_name.clone(),
            report_mime_type: constants::REPORT_MIME_TYPE,
        })
    }
}

impl PipelineOutcome {
    /// Write the report into `dir` under its configured file name
    pub fn save_report(&self, dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.report_file_name);
        fs::write(&path, &self.report)?;
        info!("💾 Saved report to {}", path.display());
        Ok(path)
    }
}
