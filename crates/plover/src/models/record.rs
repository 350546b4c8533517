use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::{ExchangeMessage, MessageContent};
use super::role::Role;
use crate::identifier::generate_id;

/// A message as the chat store holds it. Immutable once saved, removed only
/// when the owning chat is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedMessage {
    pub id: String,
    pub chat_id: String,
    pub role: Role,
    pub content: Value,
    pub created_at: DateTime<Utc>,
}

impl PersistedMessage {
    /// Derive a record from an exchange message, stamping a fresh id and
    /// the current time. Structured content is stored as JSON so that tool
    /// calls survive persistence and replay.
    pub fn from_exchange(chat_id: &str, message: &ExchangeMessage) -> Self {
        PersistedMessage {
            id: generate_id(),
            chat_id: chat_id.to_string(),
            role: message.role,
            content: serde_json::to_value(&message.content).unwrap_or(Value::Null),
            created_at: Utc::now(),
        }
    }

    /// Rebuild the exchange shape, carrying the stored identity along.
    /// Content that does not parse contributes an empty message rather
    /// than an error.
    pub fn to_exchange(&self) -> ExchangeMessage {
        let content = serde_json::from_value(self.content.clone())
            .unwrap_or_else(|_| MessageContent::Text(String::new()));
        ExchangeMessage {
            id: Some(self.id.clone()),
            role: self.role,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub kind: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub document_id: String,
    pub user_id: String,
    pub original_text: String,
    pub suggested_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}
