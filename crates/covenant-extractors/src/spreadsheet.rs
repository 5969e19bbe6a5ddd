//! Spreadsheet extraction using calamine.
//!
//! Handles xlsx, xls and ods workbooks. Each sheet contributes a heading
//! segment followed by one ` | `-joined line per non-empty row.

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::{debug, warn};

use covenant_core::{CovenantResult, DocumentParser, ParsedSections};

use crate::error::ExtractError;

/// Workbook parser. Rows are reported as both text and table rows.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetParser;

impl SpreadsheetParser {
    /// Create a new spreadsheet parser.
    pub fn new() -> Self {
        Self
    }

    fn extract_sync(content: Vec<u8>) -> Result<ParsedSections, ExtractError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))
            .map_err(|e| ExtractError::Spreadsheet(format!("Failed to open workbook: {}", e)))?;

        let mut segments = Vec::new();
        let mut tables = Vec::new();

        for sheet in workbook.sheet_names() {
            let range = match workbook.worksheet_range(&sheet) {
                Ok(range) => range,
                Err(e) => {
                    warn!(sheet = %sheet, error = %e, "Skipping unreadable sheet");
                    continue;
                }
            };

            let rows: Vec<String> = range.rows().filter_map(Self::render_row).collect();
            if rows.is_empty() {
                continue;
            }

            segments.push(format!("[{}]", sheet));
            segments.extend(rows.iter().cloned());
            tables.extend(rows);
        }

        Ok(ParsedSections::from_segments(segments).with_tables(tables))
    }

    /// Non-empty cells joined with ` | `, or `None` for a blank row.
    fn render_row(row: &[Data]) -> Option<String> {
        let cells: Vec<String> = row
            .iter()
            .filter(|cell| !matches!(cell, Data::Empty))
            .map(|cell| cell.to_string().trim().to_string())
            .filter(|cell| !cell.is_empty())
            .collect();

        if cells.is_empty() {
            None
        } else {
            Some(cells.join(" | "))
        }
    }
}

#[async_trait]
impl DocumentParser for SpreadsheetParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let content = content.to_vec();
        let sections = tokio::task::spawn_blocking(move || Self::extract_sync(content))
            .await
            .map_err(ExtractError::from)??;

        debug!(rows = sections.tables.len(), "Workbook extracted");
        Ok(sections)
    }

    fn name(&self) -> &str {
        "calamine"
    }
}
