mod conversation;
mod document;

pub use conversation::{Conversation, Message, MessageRole, WebhookPayload};
pub use document::{Document, DocumentId, KeywordFilter, SearchHit, PLACEHOLDER_SIMILARITY};
