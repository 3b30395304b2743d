pub mod analyst;
pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use analyst::{
    build_prompt, DocumentAnalyst, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_PROVIDER,
    DEFAULT_TEMPERATURE,
    NO_DOCUMENT_PLACEHOLDER,
};
pub use client::{OpenAICompatClient, OpenAICompatClientBuilder};
pub use error::{LlmError, Result};
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
pub use types::Message;
