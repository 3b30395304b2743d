use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{Conversation, NewConversation};
use crate::store::{ConversationStore, LogState};

/// Volatile store; contents are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryStore {
    state: Mutex<LogState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LogState::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn append(&self, conversation: NewConversation) -> Result<Conversation> {
        let mut state = self.state.lock().await;
        Ok(state.push(conversation))
    }

    async fn list(&self) -> Result<Vec<Conversation>> {
        Ok(self.state.lock().await.conversations.clone())
    }

    async fn clear(&self) -> Result<()> {
        self.state.lock().await.conversations.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.state.lock().await.conversations.len())
    }
}
