use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("build LLM: {0}")]
    Provider(String),
    #[error("chat: {0}")]
    Request(String),
}

/// Labeled context for one completion call. Each field is rendered inside an
/// opening/closing tag named after it, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageInput {
    fields: Vec<(&'static str, String)>,
}

impl StageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("<{name}>\n{value}\n</{name}>"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system: &str, input: &StageInput) -> Result<String, CompletionError>;
}
