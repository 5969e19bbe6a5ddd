//! Public entry points: parse stored documents, extract records, assess risks.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::CovenantConfig;
use crate::error::{CovenantError, CovenantResult};
use crate::extraction::ExtractionOrchestrator;
use crate::parsing::{ParserSet, ParsingStrategyEngine};
use crate::risk::RiskAssessmentEngine;
use crate::traits::{DocumentStore, Llm};
use crate::types::{
    extension_of, AnalysisDepth, BatchFailure, BatchOutcome, ContractRecord, DocumentPreview,
    ExtractionDepth, FileKind, FormatEntry, ParseFlags, ParseMetadata, ParseStrategy,
    ParsedDocument, RiskAssessment, StrategyEntry, SupportedFormats,
};

/// Features listed in the formats catalogue.
const FEATURES: [&str; 4] = [
    "Table extraction",
    "Image description extraction",
    "Batch processing",
    "Intelligent PDF type detection",
];

/// Document parsing, extraction and risk assessment over one store.
pub struct DocumentService {
    config: Arc<CovenantConfig>,
    store: Arc<dyn DocumentStore>,
    engine: ParsingStrategyEngine,
    orchestrator: ExtractionOrchestrator,
    risk: RiskAssessmentEngine,
}

impl DocumentService {
    /// Create a service.
    ///
    /// Use `ParserFactory` from covenant-extractors and `LlmFactory` from
    /// covenant-llm to build the parsers and model.
    pub fn new(
        config: Arc<CovenantConfig>,
        store: Arc<dyn DocumentStore>,
        parsers: ParserSet,
        llm: Arc<dyn Llm>,
    ) -> Self {
        let engine = ParsingStrategyEngine::new(parsers, &config.parsing);
        let orchestrator = ExtractionOrchestrator::new(llm.clone(), config.extraction.clone());
        let risk = RiskAssessmentEngine::new(llm, config.risk.clone());
        Self {
            config,
            store,
            engine,
            orchestrator,
            risk,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CovenantConfig {
        &self.config
    }

    /// Parse one stored document.
    ///
    /// Lookup, access and format problems are errors. A document whose
    /// parsers all failed is returned with empty content and provenance
    /// `failed`.
    pub async fn parse_document(
        &self,
        document_id: &str,
        strategy: ParseStrategy,
        flags: ParseFlags,
    ) -> CovenantResult<ParsedDocument> {
        let start = Instant::now();

        if !self.config.parsing.strategies.contains(&strategy) {
            return Err(CovenantError::validation_with_suggestion(
                format!("Unsupported strategy: {}", strategy),
                "Use one of the strategies listed by supported_formats",
            ));
        }

        let document = self.store.locate(document_id).await?;
        let extension = extension_of(&document.name);
        let kind = FileKind::from_extension(&extension)
            .filter(|_| self.config.parsing.supports_extension(&extension))
            .ok_or_else(|| {
                error!(document_id, extension = %extension, "Unsupported file format");
                CovenantError::unsupported_format(extension.clone())
            })?;

        let bytes = self.store.fetch(&document).await?;
        let outcome = self.engine.parse(strategy, &bytes, kind, flags).await;

        let parse_time_secs = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;
        let metadata = ParseMetadata {
            parse_time_secs,
            content_length: outcome.content.chars().count(),
            word_count: outcome.content.split_whitespace().count(),
            strategy_used: strategy,
            detected_type: outcome.detected_type,
        };

        info!(
            document_id,
            file_name = %document.name,
            strategy = %strategy,
            parser = %outcome.parser_used,
            "Parsed document in {}s",
            parse_time_secs
        );

        Ok(ParsedDocument {
            document_id: document.id,
            file_name: document.name,
            file_type: extension,
            file_size: document.size,
            parser_used: outcome.parser_used,
            content: outcome.content,
            metadata,
            tables: if flags.extract_tables { outcome.tables } else { Vec::new() },
            images: if flags.extract_images { outcome.images } else { Vec::new() },
        })
    }

    /// Parse several documents in order.
    ///
    /// A document that errors or whose parsers all failed goes to the
    /// failure list; the rest of the batch continues.
    pub async fn parse_documents_batch(
        &self,
        document_ids: &[String],
        strategy: ParseStrategy,
        flags: ParseFlags,
    ) -> CovenantResult<BatchOutcome> {
        if document_ids.is_empty() {
            return Err(CovenantError::validation_with_suggestion(
                "Document id list is empty",
                "Provide at least one document id",
            ));
        }
        let max = self.config.parsing.max_batch_size;
        if document_ids.len() > max {
            return Err(CovenantError::batch_limit(document_ids.len(), max));
        }

        let mut outcome = BatchOutcome::default();
        for document_id in document_ids {
            match self.parse_document(document_id, strategy, flags).await {
                Ok(parsed) if parsed.parser_used == crate::types::PARSER_FAILED => {
                    warn!(document_id = %document_id, "Batch entry produced no content");
                    outcome.failed.push(BatchFailure {
                        document_id: document_id.clone(),
                        error: "Parse failed".to_string(),
                    });
                }
                Ok(parsed) => outcome.succeeded.push(parsed),
                Err(e) => {
                    warn!(document_id = %document_id, "Batch entry failed: {}", e);
                    outcome.failed.push(BatchFailure {
                        document_id: document_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            total = outcome.total(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Batch parse completed"
        );
        Ok(outcome)
    }

    /// Leading characters of a document parsed with the fast strategy.
    pub async fn preview_document(
        &self,
        document_id: &str,
        max_length: Option<usize>,
    ) -> CovenantResult<DocumentPreview> {
        let max_length = max_length.unwrap_or(self.config.parsing.preview_length);
        let parsed = self
            .parse_document(document_id, ParseStrategy::Fast, ParseFlags::default())
            .await?;

        let total_length = parsed.content.chars().count();
        Ok(DocumentPreview {
            document_id: parsed.document_id,
            file_name: parsed.file_name,
            file_type: parsed.file_type,
            preview_content: parsed.content.chars().take(max_length).collect(),
            total_length,
            is_truncated: total_length > max_length,
            parser_used: parsed.parser_used,
        })
    }

    /// Formats, strategies and features available.
    pub fn supported_formats(&self) -> SupportedFormats {
        let parsing = &self.config.parsing;
        SupportedFormats {
            formats: parsing
                .supported_formats
                .iter()
                .filter_map(|ext| {
                    FileKind::from_extension(ext).map(|kind| FormatEntry {
                        extension: ext.clone(),
                        description: kind.display_name().to_string(),
                    })
                })
                .collect(),
            strategies: parsing
                .strategies
                .iter()
                .map(|s| StrategyEntry {
                    strategy: *s,
                    description: s.description().to_string(),
                })
                .collect(),
            features: FEATURES.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Extract a contract record from text.
    ///
    /// Fails with [`CovenantError::FatalStage`] when basic info cannot be
    /// extracted.
    pub async fn extract_structured_record(
        &self,
        text: &str,
        depth: ExtractionDepth,
    ) -> CovenantResult<ContractRecord> {
        if text.trim().is_empty() {
            return Err(CovenantError::validation("Contract text is empty"));
        }
        info!(depth = %depth, chars = text.len(), "Starting contract extraction");
        self.orchestrator.extract(text).await
    }

    /// Parse a stored document and extract a record from its text.
    pub async fn extract_from_document(
        &self,
        document_id: &str,
        depth: ExtractionDepth,
    ) -> CovenantResult<ContractRecord> {
        let parsed = self
            .parse_document(document_id, ParseStrategy::Auto, ParseFlags::default())
            .await?;
        if parsed.content.trim().is_empty() {
            error!(document_id, parser = %parsed.parser_used, "Parsed document has no text");
            return Err(CovenantError::parse_failure(format!(
                "No text could be parsed from document '{}'",
                document_id
            )));
        }
        self.extract_structured_record(&parsed.content, depth).await
    }

    /// Assess the risks of a record. Never fails.
    pub async fn assess_risks(&self, record: &ContractRecord, depth: AnalysisDepth) -> RiskAssessment {
        info!(record_id = %record.id, depth = %depth, "Starting risk assessment");
        self.risk.assess(record).await
    }
}
