//! Format parser trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CovenantResult;

/// Ordered text produced by a format parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSections {
    /// Text segments in reading order (paragraphs, pages, sheet rows).
    pub segments: Vec<String>,
    /// Table rows rendered as text, one entry per row.
    pub tables: Vec<String>,
}

impl ParsedSections {
    /// Sections with text segments only.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self {
            segments,
            tables: Vec::new(),
        }
    }

    /// Set the table rows.
    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = tables;
        self
    }

    /// Non-blank segments joined with newlines.
    pub fn joined_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Converts raw file bytes into ordered text.
///
/// Parsers are opaque to the engine: they may be slow, may fail and may
/// panic. The engine isolates every call.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse the file bytes.
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections>;

    /// Short name used in log records.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_text_skips_blank_segments() {
        let sections = ParsedSections::from_segments(vec![
            "first".to_string(),
            "   ".to_string(),
            String::new(),
            "second".to_string(),
        ]);
        assert_eq!(sections.joined_text(), "first\nsecond");
    }
}
