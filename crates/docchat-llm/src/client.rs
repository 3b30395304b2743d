// OpenAI-compatible chat completion client (DeepSeek, OpenAI, local gateways)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::traits::{ChatClient, ChatRequest, ChatResponse, TokenUsage};

/// Chat completion client (HTTP direct, no SDK)
///
/// Posts to the configured URL as-is, so `api_url` must be the full
/// completions endpoint, e.g. `https://api.deepseek.com/chat/completions`.
#[derive(Debug)]
pub struct OpenAICompatClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl OpenAICompatClient {
    pub fn builder() -> OpenAICompatClientBuilder {
        OpenAICompatClientBuilder::default()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build chat completion request payload
    fn build_chat_request(&self, request: &ChatRequest) -> Result<Value> {
        let mut payload = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
        });

        if let Some(obj) = payload.as_object_mut() {
            if let Some(temp) = request.options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = request.options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
        }

        Ok(payload)
    }
}

#[async_trait]
impl ChatClient for OpenAICompatClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request)?;
        let started = Instant::now();

        let response = self
            .http_client
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Chat API returned an error status");
            return Err(LlmError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let raw: Value = serde_json::from_slice(&bytes)?;
        let parsed: ChatCompletionResponse = serde_json::from_value(raw.clone())?;

        tracing::debug!(
            model = %request.model,
            choices = parsed.choices.len(),
            duration_ms = %started.elapsed().as_millis(),
            "Chat completion received"
        );

        let choice = parsed.choices.into_iter().next();
        Ok(ChatResponse {
            finish_reason: choice.as_ref().and_then(|c| c.finish_reason.clone()),
            content: choice.and_then(|c| c.message.content),
            usage: parsed.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            raw,
        })
    }
}

/// Builder for [`OpenAICompatClient`]
#[derive(Debug, Default)]
pub struct OpenAICompatClientBuilder {
    api_key: Option<String>,
    api_url: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAICompatClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Whole-request timeout for each completion call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<OpenAICompatClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Config("API key is required".to_string()))?;
        let api_url = self
            .api_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| LlmError::Config("API URL is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| LlmError::Config("Invalid API key format".to_string()))?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(OpenAICompatClient {
            http_client,
            api_url,
        })
    }
}

// ============================================================================
// WIRE RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
