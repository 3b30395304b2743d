//! Prompt assembly and the single-shot analysis call.

use std::sync::Arc;

use crate::error::{LlmError, Result};
use crate::traits::{ChatClient, ChatOptions, ChatRequest};
use crate::types::Message;

/// Document text used when no file was attached or nothing was extracted.
pub const NO_DOCUMENT_PLACEHOLDER: &str = "No document provided.";

pub const DEFAULT_MODEL: &str = "deepseek-chat";
/// Provider name used in failure messages shown to the user.
pub const DEFAULT_PROVIDER: &str = "DeepSeek";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

const ANALYSIS_INSTRUCTION: &str =
    "Please analyze the document and respond to the user's request based on the document content.";

/// Combine document text and the user's request into one message body.
pub fn build_prompt(document_text: &str, prompt: &str) -> String {
    format!(
        "\nDocument Content:\n{}\n\nUser Request:\n{}\n\n{}\n",
        document_text, prompt, ANALYSIS_INSTRUCTION
    )
}

/// Sends a document plus a user request to the chat model as a fresh,
/// single-message conversation.
#[derive(Clone)]
pub struct DocumentAnalyst {
    client: Arc<dyn ChatClient>,
    model: String,
    provider: String,
    options: ChatOptions,
}

impl DocumentAnalyst {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            options: ChatOptions::new()
                .temperature(DEFAULT_TEMPERATURE)
                .max_tokens(DEFAULT_MAX_TOKENS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.options = self.options.temperature(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options = self.options.max_tokens(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `Error calling <provider> API: <error>`
    pub fn describe_failure(&self, error: &LlmError) -> String {
        format!("Error calling {} API: {}", self.provider, error)
    }

    /// Returns the first choice's message content.
    pub async fn analyze(&self, prompt: &str, document_text: &str) -> Result<String> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![Message::human(build_prompt(document_text, prompt))],
        )
        .with_options(self.options.clone());

        let response = self.client.chat(request).await?;
        response.content.ok_or(LlmError::EmptyResponse)
    }

    /// Like [`analyze`](Self::analyze), but a failure becomes the response text.
    pub async fn analyze_or_describe(&self, prompt: &str, document_text: &str) -> String {
        match self.analyze(prompt, document_text).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Chat completion failed");
                self.describe_failure(&e)
            }
        }
    }
}
