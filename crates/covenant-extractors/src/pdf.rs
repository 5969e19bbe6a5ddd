//! PDF text-layer extraction using pdf-extract.
//!
//! Reads only the embedded text layer. Scanned pages come back empty, which
//! is what the classifier relies on to spot image-based documents.

use async_trait::async_trait;
use tracing::debug;

use covenant_core::{CovenantResult, DocumentParser, ParsedSections};

use crate::error::ExtractError;

/// Text-layer PDF parser. One segment per page.
#[derive(Debug, Clone, Default)]
pub struct PdfTextParser;

impl PdfTextParser {
    /// Create a new PDF text parser.
    pub fn new() -> Self {
        Self
    }

    /// Extract page texts synchronously (called within spawn_blocking).
    fn extract_sync(content: Vec<u8>) -> Result<Vec<String>, ExtractError> {
        pdf_extract::extract_text_from_mem_by_pages(&content)
            .map_err(|e| ExtractError::Pdf(format!("Failed to read text layer: {}", e)))
    }
}

#[async_trait]
impl DocumentParser for PdfTextParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let content = content.to_vec();
        let pages = tokio::task::spawn_blocking(move || Self::extract_sync(content))
            .await
            .map_err(ExtractError::from)??;

        debug!(pages = pages.len(), "PDF text layer extracted");
        Ok(ParsedSections::from_segments(pages))
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::make_text_pdf;
    use covenant_core::CovenantError;

    #[tokio::test]
    async fn test_extracts_text_layer() {
        let bytes = make_text_pdf("Lease agreement between Acme and Beta");
        let sections = PdfTextParser::new().parse(&bytes).await.unwrap();

        assert_eq!(sections.segments.len(), 1);
        let text = sections.joined_text();
        assert!(text.contains("Lease") || text.contains("Acme"), "got: {text}");
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_parse_failure() {
        let result = PdfTextParser::new().parse(b"not a pdf").await;
        assert!(matches!(result, Err(CovenantError::ParseFailure { .. })));
    }
}
