use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ChatResult;
use crate::models::record::{Chat, Document, PersistedMessage, Suggestion};

/// Persistence seam for chats, their messages, and suggestion records.
///
/// Implementations own durability; callers never see partial writes from
/// `save_messages`. Deleting a chat removes its messages with it.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn save_chat(&self, chat: Chat) -> ChatResult<()>;
    async fn get_chat(&self, id: &str) -> ChatResult<Option<Chat>>;
    async fn delete_chat(&self, id: &str) -> ChatResult<()>;
    async fn save_messages(&self, messages: Vec<PersistedMessage>) -> ChatResult<()>;
    async fn messages_for_chat(&self, chat_id: &str) -> ChatResult<Vec<PersistedMessage>>;
    async fn get_document(&self, id: &str) -> ChatResult<Option<Document>>;
    async fn save_suggestions(&self, suggestions: Vec<Suggestion>) -> ChatResult<()>;
}

/// In-process store backed by maps; the default wiring for the server and
/// the fixture for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    chats: HashMap<String, Chat>,
    // Insertion order doubles as conversation order
    messages: Vec<PersistedMessage>,
    documents: HashMap<String, Document>,
    suggestions: Vec<Suggestion>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, e.g. before exercising the suggestion flow
    pub async fn insert_document(&self, document: Document) {
        let mut inner = self.inner.write().await;
        inner.documents.insert(document.id.clone(), document);
    }

    pub async fn suggestions_for_document(&self, document_id: &str) -> Vec<Suggestion> {
        let inner = self.inner.read().await;
        inner
            .suggestions
            .iter()
            .filter(|s| s.document_id == document_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn save_chat(&self, chat: Chat) -> ChatResult<()> {
        let mut inner = self.inner.write().await;
        inner.chats.insert(chat.id.clone(), chat);
        Ok(())
    }

    async fn get_chat(&self, id: &str) -> ChatResult<Option<Chat>> {
        let inner = self.inner.read().await;
        Ok(inner.chats.get(id).cloned())
    }

    async fn delete_chat(&self, id: &str) -> ChatResult<()> {
        let mut inner = self.inner.write().await;
        inner.chats.remove(id);
        inner.messages.retain(|message| message.chat_id != id);
        Ok(())
    }

    async fn save_messages(&self, messages: Vec<PersistedMessage>) -> ChatResult<()> {
        let mut inner = self.inner.write().await;
        inner.messages.extend(messages);
        Ok(())
    }

    async fn messages_for_chat(&self, chat_id: &str) -> ChatResult<Vec<PersistedMessage>> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .filter(|message| message.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn get_document(&self, id: &str) -> ChatResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner.documents.get(id).cloned())
    }

    async fn save_suggestions(&self, suggestions: Vec<Suggestion>) -> ChatResult<()> {
        let mut inner = self.inner.write().await;
        inner.suggestions.extend(suggestions);
        Ok(())
    }
}
