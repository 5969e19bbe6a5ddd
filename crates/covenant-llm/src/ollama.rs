//! Ollama LLM provider implementation.

use async_trait::async_trait;
use tracing::debug;

use covenant_core::error::{CovenantError, CovenantResult};
use covenant_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse};
use covenant_core::types::Message;

#[cfg(feature = "ollama")]
use covenant_core::types::MessageRole;
#[cfg(feature = "ollama")]
use ollama_rs::{
    generation::chat::{ChatMessage, ChatMessageRequest, MessageRole as OllamaRole},
    generation::options::GenerationOptions as OllamaOptions,
    Ollama,
};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5:14b";
#[cfg(feature = "ollama")]
const JSON_INSTRUCTION: &str = "\n\nPlease respond with valid JSON only.";

/// Ollama LLM provider.
pub struct OllamaLlm {
    #[cfg(feature = "ollama")]
    client: Ollama,
    config: LlmConfig,
    host: String,
    port: u16,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider.
    pub fn new(config: LlmConfig) -> CovenantResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse host and port from base_url
        let url = url::Url::parse(&base_url)
            .map_err(|e| CovenantError::Configuration(format!("Invalid Ollama URL: {}", e)))?;

        let host = format!("{}://{}", url.scheme(), url.host_str().unwrap_or("localhost"));
        let port = url.port().unwrap_or(11434);

        #[cfg(feature = "ollama")]
        let client = Ollama::new(host.clone(), port);

        let mut config = config;
        if config.model.is_empty() {
            config.model = DEFAULT_MODEL.to_string();
        }

        Ok(Self {
            #[cfg(feature = "ollama")]
            client,
            config,
            host,
            port,
        })
    }

    /// Server address the provider talks to.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[cfg(feature = "ollama")]
    fn message_to_ollama(msg: &Message) -> ChatMessage {
        ChatMessage {
            role: match msg.role {
                MessageRole::System => OllamaRole::System,
                MessageRole::User => OllamaRole::User,
                MessageRole::Assistant => OllamaRole::Assistant,
            },
            content: msg.content.clone(),
            images: None,
        }
    }
}

#[async_trait]
impl Llm for OllamaLlm {
    #[cfg(feature = "ollama")]
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> CovenantResult<LlmResponse> {
        let options = options.unwrap_or_default();

        let mut ollama_messages: Vec<ChatMessage> =
            messages.iter().map(Self::message_to_ollama).collect();

        // Ollama is prompted rather than constrained into JSON
        if options.json_mode {
            if let Some(last) = ollama_messages.last_mut() {
                last.content.push_str(JSON_INSTRUCTION);
            }
        }

        let sampling = OllamaOptions::default()
            .temperature(options.temperature.unwrap_or(self.config.temperature))
            .top_p(options.top_p.unwrap_or(self.config.top_p))
            .num_predict(options.max_tokens.unwrap_or(self.config.max_tokens) as i32);

        let request =
            ChatMessageRequest::new(self.config.model.clone(), ollama_messages).options(sampling);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| CovenantError::llm_connection(format!("Ollama API error: {}", e)))?;

        debug!(model = %self.config.model, endpoint = %self.endpoint(), "Ollama generation finished");
        let content = response.message.map(|m| m.content);

        Ok(LlmResponse {
            content,
            usage: None,
        })
    }

    #[cfg(not(feature = "ollama"))]
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> CovenantResult<LlmResponse> {
        debug!(endpoint = %self.endpoint(), "Ollama feature disabled");
        Err(CovenantError::Configuration(
            "Ollama feature not enabled. Enable the 'ollama' feature.".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_base_url() {
        let llm = OllamaLlm::new(LlmConfig {
            base_url: Some("http://gpu-box:8080".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(llm.endpoint(), "http://gpu-box:8080");
        assert_eq!(llm.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_default_endpoint() {
        let llm = OllamaLlm::new(LlmConfig::default()).unwrap();
        assert_eq!(llm.endpoint(), "http://localhost:11434");
    }

    #[test]
    fn test_invalid_url() {
        let result = OllamaLlm::new(LlmConfig {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(CovenantError::Configuration(_))));
    }
}
