use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{ChatError, ChatResult};
use crate::identifier::generate_id;
use crate::models::record::Suggestion;
use crate::store::ChatStore;

/// One proposed edit against a document, as the model supplies it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub original_text: String,
    pub suggested_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Record review suggestions against a document.
///
/// This is the one operation around the pipeline that raises: the caller
/// must be known (`Unauthorized`) and the document must exist (`NotFound`).
/// Each accepted suggestion is stamped with a fresh id and timestamp.
pub async fn request_suggestions(
    store: &dyn ChatStore,
    user_id: Option<&str>,
    document_id: &str,
    suggestions: Vec<SuggestionRequest>,
) -> ChatResult<Value> {
    let user_id = user_id.ok_or(ChatError::Unauthorized)?;
    let document = store
        .get_document(document_id)
        .await?
        .ok_or_else(|| ChatError::NotFound(format!("document {}", document_id)))?;

    let records = suggestions
        .into_iter()
        .map(|suggestion| Suggestion {
            id: generate_id(),
            document_id: document.id.clone(),
            user_id: user_id.to_string(),
            original_text: suggestion.original_text,
            suggested_text: suggestion.suggested_text,
            description: suggestion.description,
            is_resolved: false,
            created_at: Utc::now(),
        })
        .collect();
    store.save_suggestions(records).await?;

    Ok(json!({
        "id": document.id,
        "title": document.title,
        "kind": document.kind,
        "message": "Suggestions added",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Document;
    use crate::store::MemoryStore;

    fn sample_document() -> Document {
        Document {
            id: "doc-1".to_string(),
            user_id: "u1".to_string(),
            title: "Notes".to_string(),
            kind: "text".to_string(),
            content: "draft".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_request() -> SuggestionRequest {
        SuggestionRequest {
            original_text: "teh".to_string(),
            suggested_text: "the".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_requires_a_known_caller() {
        let store = MemoryStore::new();
        let err = request_suggestions(&store, None, "doc-1", vec![sample_request()])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = request_suggestions(&store, Some("u1"), "doc-1", vec![sample_request()])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_suggestions_are_stamped_and_saved() {
        let store = MemoryStore::new();
        store.insert_document(sample_document()).await;

        let summary = request_suggestions(&store, Some("u1"), "doc-1", vec![sample_request()])
            .await
            .unwrap();
        assert_eq!(summary["title"], "Notes");

        let saved = store.suggestions_for_document("doc-1").await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].user_id, "u1");
        assert_eq!(saved[0].id.len(), 36);
        assert!(!saved[0].is_resolved);
    }
}
