//! Plain text files.

use async_trait::async_trait;

use covenant_core::{CovenantResult, DocumentParser, ParsedSections};

const UTF8_BOM: &str = "\u{feff}";

/// Decodes UTF-8 (invalid sequences replaced) and splits on lines.
#[derive(Debug, Clone, Default)]
pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for TextParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let text = String::from_utf8_lossy(content);
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);

        let segments = text
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();
        Ok(ParsedSections::from_segments(segments))
    }

    fn name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_and_bom() {
        let content = "\u{feff}Article 1\r\n\r\nThe lessee pays monthly.  \n".as_bytes();
        let sections = TextParser::new().parse(content).await.unwrap();

        assert_eq!(sections.segments, vec!["Article 1", "", "The lessee pays monthly."]);
        assert_eq!(sections.joined_text(), "Article 1\nThe lessee pays monthly.");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let sections = TextParser::new().parse(&[b'o', b'k', 0xff]).await.unwrap();
        assert_eq!(sections.segments, vec!["ok\u{fffd}"]);
    }
}
