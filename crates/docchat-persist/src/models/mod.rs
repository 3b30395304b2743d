mod conversation;
mod timestamp;

pub use conversation::{excerpt, Conversation, NewConversation, ELLIPSIS, EXCERPT_LIMIT};
