//! HTML extraction using scraper.
//!
//! Text nodes are grouped under their nearest block-level ancestor so that
//! inline markup does not split a sentence. Script, style and other
//! non-rendered content is skipped. Table rows also become table entries.

use async_trait::async_trait;
use scraper::{Html, Node, Selector};
use tracing::debug;

use covenant_core::{CovenantResult, DocumentParser, ParsedSections};

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCKS: &[&str] = &[
    "p", "div", "li", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "pre",
    "blockquote", "section", "article", "header", "footer", "dt", "dd", "caption", "body",
];

/// HTML parser.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    fn extract(source: &str) -> ParsedSections {
        let document = Html::parse_document(source);

        let mut segments: Vec<String> = Vec::new();
        let mut current_block = None;

        for node in document.tree.root().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let fragment = text.trim();
            if fragment.is_empty() {
                continue;
            }

            let mut block = None;
            let mut skipped = false;
            for ancestor in node.ancestors() {
                if let Some(element) = ancestor.value().as_element() {
                    if SKIPPED.contains(&element.name()) {
                        skipped = true;
                        break;
                    }
                    if block.is_none() && BLOCKS.contains(&element.name()) {
                        block = Some(ancestor.id());
                    }
                }
            }
            if skipped {
                continue;
            }

            match segments.last_mut() {
                Some(last) if block.is_some() && block == current_block => {
                    last.push(' ');
                    last.push_str(fragment);
                }
                _ => segments.push(fragment.to_string()),
            }
            current_block = block;
        }

        ParsedSections::from_segments(segments).with_tables(Self::table_rows(&document))
    }

    fn table_rows(document: &Html) -> Vec<String> {
        let (Ok(rows), Ok(cells)) = (Selector::parse("tr"), Selector::parse("td, th")) else {
            return Vec::new();
        };

        document
            .select(&rows)
            .filter_map(|row| {
                let cells: Vec<String> = row
                    .select(&cells)
                    .map(|cell| cell.text().collect::<Vec<_>>().join(" ").trim().to_string())
                    .collect();
                if cells.iter().all(String::is_empty) {
                    None
                } else {
                    Some(cells.join(" | "))
                }
            })
            .collect()
    }
}

#[async_trait]
impl DocumentParser for HtmlParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let source = String::from_utf8_lossy(content);
        let sections = Self::extract(&source);

        debug!(segments = sections.segments.len(), "HTML extracted");
        Ok(sections)
    }

    fn name(&self) -> &str {
        "scraper"
    }
}
