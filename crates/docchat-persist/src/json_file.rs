use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{Conversation, NewConversation};
use crate::store::{ConversationStore, LogState};

/// Conversation log kept as one pretty-printed JSON array on disk.
///
/// Every mutation rewrites the whole file: the array is written to a sibling
/// temp file which is then renamed over the original. The mutex covers both
/// the in-memory copy and the write, so the file always matches memory.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<LogState>,
}

impl JsonFileStore {
    /// Open (or start) the log at `path`.
    ///
    /// A missing file is an empty log. Records that fail to parse are skipped,
    /// and an unreadable document counts as empty; in both cases the original
    /// file is first copied to [`backup_path`].
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let conversations = load(&path).await?;

        tracing::info!(
            path = %path.display(),
            conversations = conversations.len(),
            "Opened conversation log"
        );

        Ok(Self {
            path,
            state: Mutex::new(LogState::new(conversations)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, conversations: &[Conversation]) -> Result<()> {
        let json = serde_json::to_vec_pretty(conversations)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

/// Where an unreadable log is copied before it can be overwritten.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

async fn load(path: &Path) -> Result<Vec<Conversation>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let records = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Conversation log is not a JSON array, starting empty");
            back_up(path).await?;
            return Ok(Vec::new());
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Conversation log is not valid JSON, starting empty"
            );
            back_up(path).await?;
            return Ok(Vec::new());
        }
    };

    let total = records.len();
    let mut conversations = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Conversation>(record) {
            Ok(conversation) => conversations.push(conversation),
            Err(e) => tracing::warn!(
                path = %path.display(),
                index,
                error = %e,
                "Skipping unreadable conversation record"
            ),
        }
    }

    if conversations.len() < total {
        back_up(path).await?;
    }

    Ok(conversations)
}

/// Copies the log aside so records that could not be read survive the next write.
async fn back_up(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    tokio::fs::copy(path, &backup).await?;
    tracing::warn!(backup = %backup.display(), "Original conversation log kept");
    Ok(())
}

#[async_trait]
impl ConversationStore for JsonFileStore {
    async fn append(&self, conversation: NewConversation) -> Result<Conversation> {
        let mut state = self.state.lock().await;
        let stored = state.push(conversation);

        if let Err(e) = self.write(&state.conversations).await {
            state.conversations.pop();
            return Err(e);
        }

        tracing::debug!(id = stored.id, "Conversation appended");
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Conversation>> {
        Ok(self.state.lock().await.conversations.clone())
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.write(&[]).await?;
        state.conversations.clear();

        tracing::info!(path = %self.path.display(), "Conversation log cleared");
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.state.lock().await.conversations.len())
    }
}
