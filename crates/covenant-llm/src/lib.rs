//! covenant-llm - LLM provider implementations for covenant.
//!
//! This crate provides the model providers used by the extraction and risk
//! engines in covenant-core.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - GPT-4o and OpenAI-compatible endpoints
//! - **Anthropic** (feature: `anthropic`) - Claude 3.5, Claude 3, etc.
//! - **Ollama** (feature: `ollama`) - Local models via Ollama
//!
//! # Example
//!
//! ```ignore
//! use covenant_llm::LlmFactory;
//!
//! // From configuration
//! let llm = LlmFactory::create(&config.llm)?;
//!
//! // Or with a specific model
//! let llm = LlmFactory::anthropic_with_model("claude-3-5-sonnet-20240620")?;
//! ```

mod anthropic;
mod factory;
mod ollama;
mod openai;

pub use anthropic::AnthropicLlm;
pub use factory::LlmFactory;
pub use ollama::OllamaLlm;
pub use openai::OpenAIProvider;

// Re-export core types for convenience
pub use covenant_core::config::{LlmProvider, LlmProviderConfig};
pub use covenant_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse};
