//! Integration tests for the document service.
//!
//! Drives parsing, extraction and risk assessment end to end with an
//! in-memory store, scripted parsers and a scripted model.

use async_trait::async_trait;
use covenant_core::{
    AnalysisDepth, CovenantConfig, CovenantError, CovenantResult, DocumentParser, DocumentService,
    ExtractionDepth, GenerationOptions, InMemoryDocumentStore, Llm, LlmResponse, Message,
    ParseFlags, ParseStrategy, ParsedSections, ParserSet, ParserSlot, RiskLevel,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Echoes UTF-8 content as lines; content starting with `!` fails.
struct LineParser;

#[async_trait]
impl DocumentParser for LineParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let text = String::from_utf8_lossy(content);
        if text.starts_with('!') {
            return Err(CovenantError::parse_failure("corrupt file"));
        }
        Ok(ParsedSections::from_segments(text.lines().map(String::from).collect()))
    }

    fn name(&self) -> &str {
        "lines"
    }
}

/// Returns a fixed text regardless of content.
struct FixedParser(&'static str);

#[async_trait]
impl DocumentParser for FixedParser {
    async fn parse(&self, _content: &[u8]) -> CovenantResult<ParsedSections> {
        Ok(ParsedSections::from_segments(vec![self.0.to_string()]))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct ScriptedLlm {
    replies: Mutex<Vec<Option<&'static str>>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    fn new(replies: Vec<Option<&'static str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Llm for ScriptedLlm {
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> CovenantResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.is_empty() { None } else { replies.remove(0) };
        Ok(LlmResponse {
            content: reply.map(String::from),
            usage: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Long enough to classify as mixed, short enough to be challenged by OCR.
const TEXT_LAYER: &str = "This supply agreement is made between Acme Corporation and Beta Limited \
for the delivery of industrial widgets under the terms set out below.";

const OCR_TEXT: &str = "This supply agreement is made between Acme Corporation and Beta Limited \
for the delivery of industrial widgets under the terms set out below. Schedule A lists prices, \
quantities and delivery dates for each shipment.";

fn parsers() -> ParserSet {
    ParserSet::new()
        .with(ParserSlot::PlainText, Arc::new(LineParser))
        .with(ParserSlot::Html, Arc::new(LineParser))
        .with(ParserSlot::PdfText, Arc::new(FixedParser(TEXT_LAYER)))
        .with(ParserSlot::PdfOcr, Arc::new(FixedParser(OCR_TEXT)))
}

async fn store() -> Arc<InMemoryDocumentStore> {
    let store = Arc::new(InMemoryDocumentStore::new("tenant-a"));
    store.insert("a", "a.txt", b"first document".to_vec()).await;
    store.insert("b", "b.txt", b"!broken".to_vec()).await;
    store.insert("c", "c.htm", b"third document".to_vec()).await;
    store.insert("d", "d.bin", b"binary".to_vec()).await;
    store.insert("e", "e.txt", b"fifth document".to_vec()).await;
    store.insert("scan", "scan.pdf", b"%PDF-1.7".to_vec()).await;
    store
        .insert_for("tenant-b", "f", "f.txt", b"other tenant".to_vec())
        .await;
    store
}

async fn service(llm: Arc<ScriptedLlm>) -> DocumentService {
    DocumentService::new(
        Arc::new(CovenantConfig::default()),
        store().await,
        parsers(),
        llm,
    )
}

/// Batch keeps input order among successes and collects every failure.
#[tokio::test]
async fn test_batch_partitions_in_order() {
    let svc = service(ScriptedLlm::new(vec![])).await;
    let ids: Vec<String> = ["a", "b", "c", "missing", "d", "f", "e"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let outcome = svc
        .parse_documents_batch(&ids, ParseStrategy::Auto, ParseFlags::default())
        .await
        .unwrap();

    assert_eq!(outcome.total(), 7);
    let succeeded: Vec<&str> = outcome
        .succeeded
        .iter()
        .map(|d| d.document_id.as_str())
        .collect();
    assert_eq!(succeeded, vec!["a", "c", "e"]);

    let failed: Vec<&str> = outcome
        .failed
        .iter()
        .map(|f| f.document_id.as_str())
        .collect();
    assert_eq!(failed, vec!["b", "missing", "d", "f"]);
    assert_eq!(outcome.failed[0].error, "Parse failed");
    assert!(outcome.failed[1].error.contains("not found"));
    assert!(outcome.failed[2].error.contains(".bin"));
    assert!(outcome.failed[3].error.contains("Access denied"));
}

/// A short text layer is challenged by OCR, which wins when it is longer.
#[tokio::test]
async fn test_mixed_pdf_uses_ocr_fallback() {
    let svc = service(ScriptedLlm::new(vec![])).await;
    let parsed = svc
        .parse_document("scan", ParseStrategy::Auto, ParseFlags::default())
        .await
        .unwrap();

    assert_eq!(parsed.parser_used, "OCR_Parser_Fallback");
    assert_eq!(parsed.metadata.detected_type.as_deref(), Some("mixed"));
    assert!(parsed.content.ends_with("for each shipment."));
}

/// Forced fast mode never runs OCR.
#[tokio::test]
async fn test_fast_pdf_is_text_layer_only() {
    let svc = service(ScriptedLlm::new(vec![])).await;
    let parsed = svc
        .parse_document("scan", ParseStrategy::Fast, ParseFlags::default())
        .await
        .unwrap();
    assert_eq!(parsed.parser_used, "PlainParser");
    assert_eq!(parsed.content, TEXT_LAYER);
    assert_eq!(parsed.metadata.detected_type.as_deref(), Some("fast_mode"));
}

/// Without basic info no later stage is attempted and no record exists.
#[tokio::test]
async fn test_basic_info_failure_short_circuits() {
    let llm = ScriptedLlm::new(vec![
        Some("I could not find a contract in this text."),
        Some(r#"{"parties": [{"name": "Acme", "party_type": "company"}]}"#),
    ]);
    let svc = service(llm.clone()).await;

    let err = svc
        .extract_structured_record("Some unrelated text", ExtractionDepth::Basic)
        .await
        .unwrap_err();

    assert!(matches!(err, CovenantError::FatalStage { ref stage, .. } if stage == "basic_info"));
    assert_eq!(llm.calls(), 1);
}

/// Later stages degrade to empty values and the record is still built.
#[tokio::test]
async fn test_degraded_stages_still_assemble() {
    let llm = ScriptedLlm::new(vec![
        Some(r#"```json
{"title": "Consulting Agreement", "contract_type": "service", "dates": {"signing_date": "2024-03-01"}}
```"#),
        None,
        Some("not json at all"),
        Some(r#"{"unexpected": true}"#),
    ]);
    let svc = service(llm.clone()).await;

    let record = svc
        .extract_structured_record("CONSULTING AGREEMENT ...", ExtractionDepth::Detailed)
        .await
        .unwrap();

    assert_eq!(llm.calls(), 4);
    assert_eq!(record.basic_info.title, "Consulting Agreement");
    assert_eq!(record.basic_info.signing_date.as_deref(), Some("2024-03-01"));
    assert!(record.parties.is_empty());
    assert!(record.subjects.is_empty());
    assert!(record.terms.terms.is_empty());
    assert_eq!(record.raw_text, "CONSULTING AGREEMENT ...");
}

/// Full pipeline from a stored document to a risk assessment.
#[tokio::test]
async fn test_document_to_assessment() {
    let llm = ScriptedLlm::new(vec![
        Some(r#"{"title": "First", "contract_type": "sale"}"#),
        Some(r#"{"name": "Acme", "party_type": "company", "role": "seller"}"#),
        Some(r#"{"subjects": [{"name": "Widgets", "subject_type": "goods", "description": "1000 units", "transaction_price": 5000}]}"#),
        Some(r#"{"terms": []}"#),
        Some(
            r#"[{"risk_type": "payment risk", "description": "No deposit", "level": "high"},
                {"risk_type": "delivery risk", "description": "No date", "level": "medium"},
                {"risk_type": "quality risk", "description": "No inspection", "level": "medium"},
                {"risk_type": "breach risk", "description": "No penalty", "level": "medium"}]"#,
        ),
    ]);
    let svc = service(llm).await;

    let record = svc
        .extract_from_document("a", ExtractionDepth::Basic)
        .await
        .unwrap();
    assert_eq!(record.parties.len(), 1);
    assert_eq!(record.parties[0].role.as_deref(), Some("seller"));
    assert_eq!(record.subjects[0].transaction_price.as_deref(), Some("5000"));

    let assessment = svc.assess_risks(&record, AnalysisDepth::Comprehensive).await;
    assert_eq!(assessment.risks.len(), 4);
    assert_eq!(assessment.overall_level, RiskLevel::High);
    assert!(assessment.summary.contains("No deposit"));
}

/// A document with no parseable text cannot be extracted.
#[tokio::test]
async fn test_extract_from_unparseable_document() {
    let llm = ScriptedLlm::new(vec![]);
    let svc = service(llm.clone()).await;

    let err = svc
        .extract_from_document("b", ExtractionDepth::Basic)
        .await
        .unwrap_err();
    assert!(matches!(err, CovenantError::ParseFailure { .. }));
    assert_eq!(llm.calls(), 0);
}
