use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Conversation, NewConversation};

/// Append-only conversation log.
///
/// Implementations serialize mutations internally, so concurrent callers
/// never lose updates or observe duplicate ids.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Assign the next id, append, and persist.
    async fn append(&self, conversation: NewConversation) -> Result<Conversation>;

    /// All conversations in insertion order.
    async fn list(&self) -> Result<Vec<Conversation>>;

    /// Replace the log with an empty sequence.
    async fn clear(&self) -> Result<()>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// In-memory log plus the id counter, guarded by the owning store's mutex.
#[derive(Debug)]
pub(crate) struct LogState {
    pub conversations: Vec<Conversation>,
    next_id: u64,
}

impl LogState {
    /// The counter resumes after the largest id already present.
    pub fn new(conversations: Vec<Conversation>) -> Self {
        let next_id = conversations.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            conversations,
            next_id,
        }
    }

    #[cfg(test)]
    pub fn peek_id(&self) -> u64 {
        self.next_id
    }

    pub fn push(&mut self, conversation: NewConversation) -> Conversation {
        let stored = conversation.with_id(self.next_id);
        self.next_id += 1;
        self.conversations.push(stored.clone());
        stored
    }
}
