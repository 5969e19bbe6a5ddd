//! Factory for creating LLM providers.

use std::sync::Arc;
use tracing::info;

use covenant_core::config::{LlmProvider, LlmProviderConfig};
use covenant_core::error::CovenantResult;
use covenant_core::traits::{Llm, LlmConfig};

use crate::anthropic::AnthropicLlm;
use crate::ollama::OllamaLlm;
use crate::openai::OpenAIProvider;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(config: &LlmProviderConfig) -> CovenantResult<Arc<dyn Llm>> {
        Self::create_with(config.provider, config.config.clone())
    }

    /// Create an LLM provider of the given type.
    pub fn create_with(provider: LlmProvider, config: LlmConfig) -> CovenantResult<Arc<dyn Llm>> {
        let llm: Arc<dyn Llm> = match provider {
            LlmProvider::OpenAI => Arc::new(OpenAIProvider::new(config)?),
            LlmProvider::Anthropic => Arc::new(AnthropicLlm::new(config)?),
            LlmProvider::Ollama => Arc::new(OllamaLlm::new(config)?),
        };
        info!(provider = ?provider, model = llm.model_name(), "Created LLM provider");
        Ok(llm)
    }

    /// Create an OpenAI LLM provider with a specific model.
    pub fn openai_with_model(model: impl Into<String>) -> CovenantResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create_with(LlmProvider::OpenAI, config)
    }

    /// Create an Anthropic LLM provider with a specific model.
    pub fn anthropic_with_model(model: impl Into<String>) -> CovenantResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create_with(LlmProvider::Anthropic, config)
    }

    /// Create an Ollama LLM provider with a specific model.
    pub fn ollama_with_model(model: impl Into<String>) -> CovenantResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create_with(LlmProvider::Ollama, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_from_provider_config() {
        let config = LlmProviderConfig {
            provider: LlmProvider::Anthropic,
            config: LlmConfig {
                model: "claude-3-haiku-20240307".to_string(),
                api_key: Some("test-key".to_string()),
                ..Default::default()
            },
        };
        let llm = LlmFactory::create(&config).unwrap();
        assert_eq!(llm.model_name(), "claude-3-haiku-20240307");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let llm = LlmFactory::ollama_with_model("llama3.1:8b").unwrap();
        assert_eq!(llm.model_name(), "llama3.1:8b");
    }
}
