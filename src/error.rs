use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Missing required columns in uploaded file: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    #[error("Failed to write report: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
