//! Error types for sift

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// No candidate header row met the minimum role coverage. Carries the
    /// first rows of the source so a caller can offer manual column mapping.
    #[error("No header row detected in the scan window")]
    HeaderDetectionFailed { preview: Vec<Vec<String>> },

    /// A header was found (or supplied) but zero rows resolved to valid
    /// transactions.
    #[error("No transactions parsed from statement")]
    NoTransactionsParsed,

    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
