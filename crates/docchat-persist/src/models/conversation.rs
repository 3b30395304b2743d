use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Stored document text is cut to this many characters.
pub const EXCERPT_LIMIT: usize = 500;

/// Appended to document text that was cut.
pub const ELLIPSIS: &str = "...";

/// One stored prompt/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: u64,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Local>,
    pub prompt: String,
    /// Excerpt of the extracted document text, see [`excerpt`].
    pub document_text: String,
    pub response: String,
    pub has_document: bool,
}

/// A conversation before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversation {
    pub timestamp: DateTime<Local>,
    pub prompt: String,
    pub document_text: String,
    pub response: String,
    pub has_document: bool,
}

impl NewConversation {
    /// Stamps the current local time and reduces `document_text` to its excerpt.
    pub fn new(
        prompt: impl Into<String>,
        document_text: &str,
        response: impl Into<String>,
        has_document: bool,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            prompt: prompt.into(),
            document_text: excerpt(document_text),
            response: response.into(),
            has_document,
        }
    }

    pub(crate) fn with_id(self, id: u64) -> Conversation {
        Conversation {
            id,
            timestamp: self.timestamp,
            prompt: self.prompt,
            document_text: self.document_text,
            response: self.response,
            has_document: self.has_document,
        }
    }
}

/// Full text when it fits in [`EXCERPT_LIMIT`] characters, otherwise the
/// first [`EXCERPT_LIMIT`] characters followed by [`ELLIPSIS`].
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
