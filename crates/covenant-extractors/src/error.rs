//! Extraction error types.

use covenant_core::CovenantError;
use thiserror::Error;

/// Errors that can occur while turning file bytes into text.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Extraction process failed.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF-specific extraction error.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// DOCX-specific extraction error.
    #[error("DOCX extraction error: {0}")]
    Docx(String),

    /// Workbook could not be opened or read.
    #[error("Spreadsheet extraction error: {0}")]
    Spreadsheet(String),

    /// Page image recognition failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

impl From<ExtractError> for CovenantError {
    fn from(err: ExtractError) -> Self {
        CovenantError::parse_failure_with_source(err.to_string(), err)
    }
}
