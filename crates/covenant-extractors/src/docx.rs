//! DOCX content extraction using docx-rs.
//!
//! Body paragraphs become text segments in reading order. Table rows are
//! rendered with ` | ` between cells and reported separately unless inline
//! tables are switched on.

use async_trait::async_trait;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use tracing::debug;

use covenant_core::{CovenantResult, DocumentParser, ParsedSections};

use crate::error::ExtractError;

/// DOCX parser using the docx-rs library.
///
/// Wraps synchronous docx-rs calls in spawn_blocking to avoid blocking the
/// async runtime.
#[derive(Debug, Clone)]
pub struct DocxParser {
    /// Whether table rows are also appended to the text segments.
    inline_tables: bool,
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxParser {
    /// Create new DOCX parser with default settings.
    pub fn new() -> Self {
        Self {
            inline_tables: false,
        }
    }

    /// Configure whether table rows are also part of the main text.
    pub fn with_inline_tables(mut self, inline: bool) -> Self {
        self.inline_tables = inline;
        self
    }

    /// Extract sections synchronously (called within spawn_blocking).
    fn extract_sync(content: Vec<u8>, inline_tables: bool) -> Result<ParsedSections, ExtractError> {
        let docx = docx_rs::read_docx(&content)
            .map_err(|e| ExtractError::Docx(format!("Failed to parse DOCX: {}", e)))?;

        let mut segments: Vec<String> = Vec::new();
        let mut tables: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    let text = Self::paragraph_text(p);
                    if !text.trim().is_empty() {
                        segments.push(text);
                    }
                }
                DocumentChild::Table(t) => {
                    let rows = Self::table_rows(t);
                    if inline_tables {
                        segments.extend(rows.iter().cloned());
                    }
                    tables.extend(rows);
                }
                _ => {}
            }
        }

        Ok(ParsedSections::from_segments(segments).with_tables(tables))
    }

    /// Extract text from a paragraph.
    fn paragraph_text(p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => Self::push_run(&mut text, r),
                ParagraphChild::Hyperlink(h) => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            Self::push_run(&mut text, r);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    fn push_run(text: &mut String, run: &docx_rs::Run) {
        for run_child in &run.children {
            match run_child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }

    /// One ` | `-joined line per non-empty table row.
    fn table_rows(t: &docx_rs::Table) -> Vec<String> {
        let mut rows = Vec::new();

        for row in &t.rows {
            let TableChild::TableRow(r) = row;
            let cells: Vec<String> = r
                .cells
                .iter()
                .map(|cell| {
                    let TableRowChild::TableCell(c) = cell;
                    c.children
                        .iter()
                        .filter_map(|child| match child {
                            TableCellContent::Paragraph(p) => Some(Self::paragraph_text(p)),
                            _ => None,
                        })
                        .filter(|para| !para.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                        .trim()
                        .to_string()
                })
                .collect();

            if cells.iter().any(|c| !c.is_empty()) {
                rows.push(cells.join(" | "));
            }
        }

        rows
    }
}

#[async_trait]
impl DocumentParser for DocxParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let content = content.to_vec();
        let inline_tables = self.inline_tables;

        let sections = tokio::task::spawn_blocking(move || Self::extract_sync(content, inline_tables))
            .await
            .map_err(ExtractError::from)??;

        debug!(
            segments = sections.segments.len(),
            table_rows = sections.tables.len(),
            "DOCX extracted"
        );
        Ok(sections)
    }

    fn name(&self) -> &str {
        "docx-rs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    fn build_docx() -> Vec<u8> {
        let table = Table::new(vec![
            TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Item"))),
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Price"))),
            ]),
            TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Widgets"))),
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("5000"))),
            ]),
        ]);

        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("SUPPLY AGREEMENT")))
            .add_paragraph(Paragraph::new())
            .add_table(table)
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Signed by both parties.")))
            .build()
            .pack(&mut buf)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_paragraphs_and_tables() {
        let sections = DocxParser::new().parse(&build_docx()).await.unwrap();

        assert_eq!(sections.tables, vec!["Item | Price", "Widgets | 5000"]);
        assert_eq!(
            sections.segments,
            vec!["SUPPLY AGREEMENT", "Signed by both parties."]
        );
    }

    #[tokio::test]
    async fn test_inline_tables() {
        let parser = DocxParser::new().with_inline_tables(true);
        let sections = parser.parse(&build_docx()).await.unwrap();

        assert_eq!(sections.segments.len(), 4);
        assert_eq!(sections.segments[1], "Item | Price");
        assert_eq!(sections.tables.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_docx() {
        let result = DocxParser::new().parse(&[]).await;
        assert!(result.is_err());
    }
}
