use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use gitdiagram_core::{AiSettings, CompletionError, CompletionService, StageInput};

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 4000;

pub fn map_backend(provider: &str) -> Result<LLMBackend, CompletionError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(CompletionError::Provider(format!("unknown provider: {other}"))),
    }
}

/// Completion backend driven by the `llm` crate, configured from [`AiSettings`].
#[derive(Debug, Clone)]
pub struct LlmCompletion {
    settings: AiSettings,
}

impl LlmCompletion {
    /// Fails early on a provider name the `llm` crate doesn't know.
    pub fn new(settings: AiSettings) -> Result<Self, CompletionError> {
        map_backend(&settings.provider)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }
}

#[async_trait]
impl CompletionService for LlmCompletion {
    async fn complete(&self, system: &str, input: &StageInput) -> Result<String, CompletionError> {
        let backend = map_backend(&self.settings.provider)?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .system(system)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let llm = builder
            .build()
            .map_err(|e| CompletionError::Provider(e.to_string()))?;

        let messages = vec![ChatMessage::user().content(input.render()).build()];

        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        Ok(reply_text(response.text()))
    }
}

/// A successful reply without text is passed on as empty; the stage's
/// extractor decides what to make of it.
fn reply_text(text: Option<String>) -> String {
    text.unwrap_or_default()
}
