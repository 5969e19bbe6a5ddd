//! Single-component extraction: prompt, call, recover, normalize, validate.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::normalize::normalize;
use super::prompts::{extraction_system_prompt, extraction_user_prompt};
use super::recovery::recover_json;
use super::schema::ComponentKind;
use crate::config::GenerationSettings;
use crate::error::{CovenantError, CovenantResult};
use crate::traits::Llm;
use crate::types::{BasicInfo, Message, Party, Subject, Terms};

/// A validated component value.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    BasicInfo(BasicInfo),
    Parties(Vec<Party>),
    Subjects(Vec<Subject>),
    Terms(Terms),
}

impl ComponentValue {
    /// Number of elements, 1 for basic info.
    pub fn len(&self) -> usize {
        match self {
            Self::BasicInfo(_) => 1,
            Self::Parties(p) => p.len(),
            Self::Subjects(s) => s.len(),
            Self::Terms(t) => t.terms.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts one typed component from contract text with a single model call.
pub struct SchemaComponentExtractor {
    llm: Arc<dyn Llm>,
    settings: GenerationSettings,
}

impl SchemaComponentExtractor {
    /// Create an extractor.
    pub fn new(llm: Arc<dyn Llm>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    /// Extract a component. Every error means the component is absent.
    pub async fn extract(&self, text: &str, kind: ComponentKind) -> CovenantResult<ComponentValue> {
        let schema = kind.presented_schema();
        let messages = vec![
            Message::system(extraction_system_prompt()),
            Message::user(extraction_user_prompt(kind, text, &schema, &self.settings.language)),
        ];
        let options = self
            .settings
            .options()
            .with_json_mode(self.llm.supports_json_mode());

        let response = self
            .llm
            .generate(&messages, Some(options))
            .await
            .map_err(|e| {
                error!(component = kind.name(), "Model call failed: {}", e);
                e
            })?;

        let content = response.content_or_empty();
        if content.trim().is_empty() {
            error!(component = kind.name(), "Model returned empty response");
            return Err(CovenantError::model_empty_response());
        }
        debug!(component = kind.name(), chars = content.len(), "Model responded");

        let recovered = recover_json(content, self.settings.log_excerpt_chars).map_err(|e| {
            if let CovenantError::RecoveryFailure { excerpt, .. } = &e {
                error!(
                    component = kind.name(),
                    "Failed to extract JSON from response: {}...", excerpt
                );
            }
            e
        })?;

        self.validate(kind, normalize(kind, recovered))
    }

    fn validate(&self, kind: ComponentKind, value: Value) -> CovenantResult<ComponentValue> {
        match kind {
            ComponentKind::BasicInfo => serde_json::from_value::<BasicInfo>(value)
                .map(ComponentValue::BasicInfo)
                .map_err(|e| invalid(kind, e)),
            ComponentKind::Terms => serde_json::from_value::<Terms>(value)
                .map(ComponentValue::Terms)
                .map_err(|e| invalid(kind, e)),
            ComponentKind::Parties => Ok(ComponentValue::Parties(validate_elements(kind, value))),
            ComponentKind::Subjects => Ok(ComponentValue::Subjects(validate_elements(kind, value))),
        }
    }
}

fn invalid(kind: ComponentKind, e: serde_json::Error) -> CovenantError {
    warn!(component = kind.name(), "Validation failed: {}", e);
    CovenantError::validation(format!("{} failed validation: {}", kind.name(), e))
}

/// Keep the elements that deserialize, dropping the rest with a warning.
fn validate_elements<T: DeserializeOwned>(kind: ComponentKind, value: Value) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(component = kind.name(), index = i, "Dropping invalid element: {}", e);
                None
            }
        })
        .collect()
}
