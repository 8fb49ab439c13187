use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of an inbound assistant webhook call.
///
/// Every level is optional: a payload without `message` or `messages`
/// simply carries no user utterance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub message: Option<Conversation>,
}

impl WebhookPayload {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            message: Some(Conversation { messages }),
        }
    }

    /// The most recent user utterance, trimmed. Empty when there is none.
    pub fn user_query(&self) -> String {
        self.message
            .as_ref()
            .and_then(Conversation::last_user_message)
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_deref().unwrap_or_default())
    }
}

/// One conversation turn.
///
/// Only the latest user turn is ever read, so other turns may carry any
/// shape: a non-string role reads as `Other`, non-string content as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: MessageRole,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: Option<String>,
}

fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MessageRole, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_content<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(content) => Ok(Some(content)),
        _ => Ok(None),
    }
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
    #[default]
    #[serde(other)]
    Other,
}
