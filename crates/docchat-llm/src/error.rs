use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Chat API returned no message content")]
    EmptyResponse,
}

impl LlmError {
    /// True when the request ran past the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Http(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
