//! Text-completion boundary to the language model service.

mod openai;

pub use openai::OpenAiModel;

use async_trait::async_trait;

use crate::error::LlmError;

/// Result type for model calls.
pub type Result<T> = std::result::Result<T, LlmError>;

/// A single request/response completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// User message.
    pub user: String,
    /// Sampling temperature; 0.0 for deterministic decoding.
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
        }
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for text-completion backends.
///
/// Implementations return the raw completion text; no streaming, no
/// interpretation of the content.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Run one completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
