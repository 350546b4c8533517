use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::ContentPart;
use super::role::Role;

/// Content of an exchange message: the model protocol sends either a bare
/// string or a sequence of structured parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(text) => text.is_empty(),
            MessageContent::Parts(parts) => parts.is_empty(),
        }
    }

    /// The structured parts, or an empty slice for plain-string content
    pub fn parts(&self) -> &[ContentPart] {
        match self {
            MessageContent::Text(_) => &[],
            MessageContent::Parts(parts) => parts,
        }
    }
}

/// A message to or from the model provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeMessage {
    /// Present when the message already has an identity from an earlier
    /// representation; preserved through conversions once assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    pub content: MessageContent,
}

impl ExchangeMessage {
    fn new(role: Role) -> Self {
        ExchangeMessage {
            id: None,
            role,
            content: MessageContent::Parts(Vec::new()),
        }
    }

    /// Create a new user message with empty structured content
    pub fn user() -> Self {
        Self::new(Role::User)
    }

    /// Create a new assistant message with empty structured content
    pub fn assistant() -> Self {
        Self::new(Role::Assistant)
    }

    /// Create a new tool message with empty structured content
    pub fn tool() -> Self {
        Self::new(Role::Tool)
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add any ContentPart to the message. Plain-string content is promoted
    /// to a structured Text part first so nothing is lost.
    pub fn with_content(mut self, part: ContentPart) -> Self {
        match &mut self.content {
            MessageContent::Parts(parts) => parts.push(part),
            MessageContent::Text(text) => {
                let parts = vec![ContentPart::text(std::mem::take(text)), part];
                self.content = MessageContent::Parts(parts);
            }
        }
        self
    }

    /// Add a text part to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(ContentPart::text(text))
    }

    /// Add a tool call part to the message
    pub fn with_tool_call<I, N>(self, tool_call_id: I, tool_name: N, args: Value) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        self.with_content(ContentPart::tool_call(tool_call_id, tool_name, args))
    }

    /// Add a tool result part to the message
    pub fn with_tool_result<I: Into<String>>(self, tool_call_id: I, result: Value) -> Self {
        self.with_content(ContentPart::tool_result(tool_call_id, result))
    }

    /// Replace the content with a plain string
    pub fn with_plain_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content = MessageContent::Text(text.into());
        self
    }

    /// Concatenated text of the message, in source order
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| part.as_text())
                .collect::<Vec<_>>()
                .concat(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_and_structured_content_deserialize() {
        let plain: ExchangeMessage =
            serde_json::from_value(json!({"role": "assistant", "content": "hi"})).unwrap();
        assert_eq!(plain.content, MessageContent::Text("hi".to_string()));

        let structured: ExchangeMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": [{"type": "text", "text": "hi"}]
        }))
        .unwrap();
        assert_eq!(structured.content.parts().len(), 1);
    }

    #[test]
    fn test_text_concatenates_parts_in_order() {
        let message = ExchangeMessage::assistant()
            .with_text("one")
            .with_tool_call("t1", "lookup", json!({}))
            .with_text("two");
        assert_eq!(message.text(), "onetwo");
    }

    #[test]
    fn test_with_content_promotes_plain_text() {
        let message = ExchangeMessage::assistant()
            .with_plain_text("hello")
            .with_tool_call("t1", "lookup", json!({}));
        assert_eq!(message.content.parts().len(), 2);
        assert_eq!(message.text(), "hello");
    }
}
