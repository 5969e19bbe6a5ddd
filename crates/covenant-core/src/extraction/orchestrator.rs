//! Staged extraction of a full contract record.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractor::{ComponentValue, SchemaComponentExtractor};
use super::schema::ComponentKind;
use crate::config::GenerationSettings;
use crate::error::{CovenantError, CovenantResult};
use crate::traits::Llm;
use crate::types::{BasicInfo, ContractRecord, Party, Subject, Terms};

/// What to do when a stage produces nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePolicy {
    /// Abort the whole extraction.
    Abort,
    /// Continue with an empty list.
    EmptyList,
    /// Continue with an empty terms record.
    EmptyTerms,
}

impl StagePolicy {
    /// Policy for a component.
    pub fn for_component(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::BasicInfo => Self::Abort,
            ComponentKind::Parties | ComponentKind::Subjects => Self::EmptyList,
            ComponentKind::Terms => Self::EmptyTerms,
        }
    }
}

/// Result of one stage after its policy has been applied.
#[derive(Debug)]
pub enum StageOutcome {
    /// The component was extracted.
    Present(ComponentValue),
    /// The component was absent and replaced by its empty value.
    Degraded(ComponentValue),
    /// The component was absent and the pipeline must stop.
    Fatal(CovenantError),
}

/// Apply a component's policy to an extraction result.
pub fn resolve_stage(kind: ComponentKind, result: CovenantResult<ComponentValue>) -> StageOutcome {
    let reason = match result {
        Ok(value) => return StageOutcome::Present(value),
        Err(e) => e,
    };

    match StagePolicy::for_component(kind) {
        StagePolicy::Abort => StageOutcome::Fatal(CovenantError::fatal_stage(
            kind.name(),
            format!("cannot continue without {}: {}", kind.name(), reason),
        )),
        StagePolicy::EmptyList => {
            warn!("Failed to extract {}, using empty list: {}", kind.name(), reason);
            StageOutcome::Degraded(match kind {
                ComponentKind::Subjects => ComponentValue::Subjects(Vec::new()),
                _ => ComponentValue::Parties(Vec::new()),
            })
        }
        StagePolicy::EmptyTerms => {
            warn!("Failed to extract {}, using empty object: {}", kind.name(), reason);
            StageOutcome::Degraded(ComponentValue::Terms(Terms::default()))
        }
    }
}

/// Position of the orchestrator in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Stage(ComponentKind),
    Assembled,
}

impl ExtractionState {
    /// State following a successful or degraded stage.
    fn next(self) -> Self {
        match self {
            Self::Stage(ComponentKind::BasicInfo) => Self::Stage(ComponentKind::Parties),
            Self::Stage(ComponentKind::Parties) => Self::Stage(ComponentKind::Subjects),
            Self::Stage(ComponentKind::Subjects) => Self::Stage(ComponentKind::Terms),
            Self::Stage(ComponentKind::Terms) | Self::Assembled => Self::Assembled,
        }
    }
}

#[derive(Default)]
struct RecordDraft {
    basic_info: Option<BasicInfo>,
    parties: Vec<Party>,
    subjects: Vec<Subject>,
    terms: Terms,
}

impl RecordDraft {
    fn fill(&mut self, value: ComponentValue) {
        match value {
            ComponentValue::BasicInfo(info) => self.basic_info = Some(info),
            ComponentValue::Parties(parties) => self.parties = parties,
            ComponentValue::Subjects(subjects) => self.subjects = subjects,
            ComponentValue::Terms(terms) => self.terms = terms,
        }
    }
}

/// Runs the component stages in order and assembles the record.
pub struct ExtractionOrchestrator {
    extractor: SchemaComponentExtractor,
}

impl ExtractionOrchestrator {
    /// Create an orchestrator.
    pub fn new(llm: Arc<dyn Llm>, settings: GenerationSettings) -> Self {
        Self {
            extractor: SchemaComponentExtractor::new(llm, settings),
        }
    }

    /// Extract a record from contract text.
    ///
    /// Fails only when basic info cannot be extracted; the other stages
    /// degrade to empty values.
    pub async fn extract(&self, text: &str) -> CovenantResult<ContractRecord> {
        let mut draft = RecordDraft::default();
        let mut state = ExtractionState::Stage(ComponentKind::BasicInfo);
        let mut step = 0;

        while let ExtractionState::Stage(kind) = state {
            step += 1;
            info!("Step {}: Extracting {}...", step, kind.name());

            match resolve_stage(kind, self.extractor.extract(text, kind).await) {
                StageOutcome::Present(value) => {
                    info!("Successfully extracted {}: {} item(s)", kind.name(), value.len());
                    draft.fill(value);
                }
                StageOutcome::Degraded(value) => draft.fill(value),
                StageOutcome::Fatal(e) => {
                    error!("Failed to extract {}, cannot continue", kind.name());
                    return Err(e);
                }
            }
            state = state.next();
        }

        let basic_info = draft.basic_info.ok_or_else(|| {
            CovenantError::fatal_stage(ComponentKind::BasicInfo.name(), "missing after assembly")
        })?;
        let record = ContractRecord::new(basic_info, draft.parties, draft.subjects, draft.terms, text);
        info!(
            title = %record.basic_info.title,
            parties = record.parties.len(),
            subjects = record.subjects.len(),
            terms = record.terms.terms.len(),
            "Contract extraction completed"
        );
        Ok(record)
    }
}
