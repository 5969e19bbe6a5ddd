//! Error types for covenant operations.
//!
//! Every failure carries a structured [`ErrorCode`] so callers can branch on
//! the category without matching message text. Parse, model and recovery
//! failures are usually absorbed inside the pipeline; the remaining variants
//! propagate to the caller of the public entry points.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for covenant operations.
pub type CovenantResult<T> = Result<T, CovenantError>;

/// Main error type for all covenant operations.
#[derive(Error, Debug)]
pub enum CovenantError {
    /// Document id unknown to the store.
    #[error("Document not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        document_id: Option<String>,
    },

    /// Caller is not allowed to read the document.
    #[error("Access denied: {message}")]
    AccessDenied {
        message: String,
        code: ErrorCode,
        document_id: Option<String>,
    },

    /// File extension is not in the supported format table.
    #[error("Unsupported format: {extension}")]
    UnsupportedFormat { extension: String, code: ErrorCode },

    /// A format parser could not produce text.
    #[error("Parse failure: {message}")]
    ParseFailure {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model returned nothing.
    #[error("Model returned an empty response")]
    ModelEmptyResponse { code: ErrorCode },

    /// No JSON value could be recovered from a model response.
    #[error("Could not recover JSON from model response: {excerpt}")]
    RecoveryFailure { excerpt: String, code: ErrorCode },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// A mandatory extraction stage produced nothing.
    #[error("Extraction stage '{stage}' failed: {message}")]
    FatalStage {
        stage: String,
        message: String,
        code: ErrorCode,
    },

    /// Model provider call failed.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A spawned parser task panicked or was cancelled.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Documents (DOC_xxx)
    DocNotFound,
    DocAccessDenied,
    DocUnsupportedFormat,
    DocParseFailed,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValInvalidFormat,
    ValBatchLimit,

    // LLM (LLM_xxx)
    LlmConnectionFailed,
    LlmGenerationFailed,
    LlmEmptyResponse,

    // Parse (PARSE_xxx)
    ParseInvalidJson,
    ParseMissingField,

    // Extraction (EXT_xxx)
    ExtStageFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DocNotFound => "DOC_001",
            ErrorCode::DocAccessDenied => "DOC_002",
            ErrorCode::DocUnsupportedFormat => "DOC_003",
            ErrorCode::DocParseFailed => "DOC_004",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValInvalidFormat => "VAL_003",
            ErrorCode::ValBatchLimit => "VAL_004",
            ErrorCode::LlmConnectionFailed => "LLM_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmEmptyResponse => "LLM_003",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::ParseMissingField => "PARSE_002",
            ErrorCode::ExtStageFailed => "EXT_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl CovenantError {
    /// Create a not found error.
    pub fn not_found(document_id: impl Into<String>) -> Self {
        let id = document_id.into();
        Self::NotFound {
            message: format!("Document with id '{}' not found", id),
            code: ErrorCode::DocNotFound,
            document_id: Some(id),
        }
    }

    /// Create an access denied error.
    pub fn access_denied(document_id: impl Into<String>) -> Self {
        let id = document_id.into();
        Self::AccessDenied {
            message: format!("No permission to read document '{}'", id),
            code: ErrorCode::DocAccessDenied,
            document_id: Some(id),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            code: ErrorCode::DocUnsupportedFormat,
        }
    }

    /// Create a parse failure.
    pub fn parse_failure(message: impl Into<String>) -> Self {
        Self::ParseFailure {
            message: message.into(),
            code: ErrorCode::DocParseFailed,
            source: None,
        }
    }

    /// Create a parse failure wrapping its cause.
    pub fn parse_failure_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ParseFailure {
            message: message.into(),
            code: ErrorCode::DocParseFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Create an empty model response error.
    pub fn model_empty_response() -> Self {
        Self::ModelEmptyResponse {
            code: ErrorCode::LlmEmptyResponse,
        }
    }

    /// Create a JSON recovery failure carrying a truncated excerpt of the response.
    pub fn recovery_failure(excerpt: impl Into<String>) -> Self {
        Self::RecoveryFailure {
            excerpt: excerpt.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a batch size validation error.
    pub fn batch_limit(len: usize, max: usize) -> Self {
        let mut details = HashMap::new();
        details.insert("requested".to_string(), len.to_string());
        details.insert("max".to_string(), max.to_string());
        Self::Validation {
            message: format!("Batch of {} documents exceeds the limit of {}", len, max),
            code: ErrorCode::ValBatchLimit,
            details,
            suggestion: Some("Split the request into smaller batches".to_string()),
        }
    }

    /// Create a fatal stage error.
    pub fn fatal_stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FatalStage {
            stage: stage.into(),
            message: message.into(),
            code: ErrorCode::ExtStageFailed,
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an LLM connection error.
    pub fn llm_connection(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmConnectionFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. } => *code,
            Self::AccessDenied { code, .. } => *code,
            Self::UnsupportedFormat { code, .. } => *code,
            Self::ParseFailure { code, .. } => *code,
            Self::ModelEmptyResponse { code } => *code,
            Self::RecoveryFailure { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::FatalStage { code, .. } => *code,
            Self::Llm { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => Some("Please check the document ID and ensure it exists"),
            Self::AccessDenied { .. } => Some("Please check that the document belongs to this tenant"),
            Self::UnsupportedFormat { .. } => {
                Some("Supported formats: .pdf .docx .doc .xlsx .xls .txt .html .htm")
            }
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Llm { .. } => Some("Please check your LLM provider configuration"),
            Self::FatalStage { .. } => Some("The document may not contain a recognizable contract"),
            _ => None,
        }
    }

    /// Whether the pipeline may absorb this error and continue with a degraded result.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ParseFailure { .. }
                | Self::ModelEmptyResponse { .. }
                | Self::RecoveryFailure { .. }
                | Self::Validation { .. }
                | Self::Llm { .. }
                | Self::TaskJoin(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = CovenantError::not_found("doc-1");
        assert_eq!(err.code(), ErrorCode::DocNotFound);
        assert!(err.to_string().contains("doc-1"));
        assert!(err.suggestion().is_some());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_batch_limit_error() {
        let err = CovenantError::batch_limit(51, 50);
        assert_eq!(err.code(), ErrorCode::ValBatchLimit);
        assert_eq!(err.code().as_str(), "VAL_004");
        match err {
            CovenantError::Validation { details, .. } => {
                assert_eq!(details.get("requested").map(String::as_str), Some("51"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_recoverable_categories() {
        assert!(CovenantError::model_empty_response().is_recoverable());
        assert!(CovenantError::recovery_failure("prose").is_recoverable());
        assert!(CovenantError::parse_failure("bad pdf").is_recoverable());
        assert!(!CovenantError::fatal_stage("basic_info", "absent").is_recoverable());
        assert!(!CovenantError::unsupported_format(".exe").is_recoverable());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::DocNotFound.as_str(), "DOC_001");
        assert_eq!(ErrorCode::ExtStageFailed.as_str(), "EXT_001");
    }
}
