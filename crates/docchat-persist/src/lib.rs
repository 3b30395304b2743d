pub mod error;
pub mod json_file;
pub mod memory;
pub mod models;
pub mod store;

pub use error::{PersistError, Result};
pub use json_file::{backup_path, JsonFileStore};
pub use memory::InMemoryStore;
pub use models::{excerpt, Conversation, NewConversation, ELLIPSIS, EXCERPT_LIMIT};
pub use store::ConversationStore;
