use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::{AnalyzerError, Result};

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "SHIPMENT_ANALYZER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "analyzer.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Number of input rows shown in the preview
    pub preview_rows: usize,
    pub filter: FilterRules,
    pub report: ReportConfig,
}

/// Exclusion rules applied by the row filter.
///
/// Milestones are matched after trimming and case-folding, so `" No Milestone Received "`
/// is excluded and numeric text such as `"2"` counts as that stop count. An exact
/// comparison of the raw cells would keep both rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Shipments with exactly this many stops are dropped
    pub excluded_stop_count: i64,
    /// Milestone statuses (compared case-insensitively) that disqualify a shipment
    pub excluded_milestones: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub file_name: String,
    pub filtered_sheet: String,
    pub summary_sheet: String,
    /// Rows added after each summary's body before the next summary starts
    pub table_spacing: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            preview_rows: constants::PREVIEW_ROWS,
            filter: FilterRules::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            excluded_stop_count: constants::EXCLUDED_STOP_COUNT,
            excluded_milestones: vec![
                constants::NO_MILESTONE_UNDERSCORED.to_string(),
                constants::NO_MILESTONE_SPACED.to_string(),
            ],
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_name: constants::REPORT_FILE_NAME.to_string(),
            filtered_sheet: constants::FILTERED_SHEET.to_string(),
            summary_sheet: constants::SUMMARY_SHEET.to_string(),
            table_spacing: constants::TABLE_SPACING,
        }
    }
}

impl AnalyzerConfig {
    /// Load from `SHIPMENT_ANALYZER_CONFIG` or `analyzer.toml`, falling back to
    /// defaults when neither file exists.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from(path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::load_from(DEFAULT_CONFIG_PATH);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.report.filtered_sheet == self.report.summary_sheet {
            return Err(AnalyzerError::Config(format!(
                "filtered_sheet and summary_sheet must differ (both '{}')",
                self.report.summary_sheet
            )));
        }
        if self.report.table_spacing == 0 {
            return Err(AnalyzerError::Config(
                "table_spacing must be at least 1 so summaries do not overlap".to_string(),
            ));
        }
        Ok(())
    }
}
