use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single part of structured content exchanged with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        args: Value,
    },
    #[serde(rename_all = "camelCase")]
    ToolResult {
        tool_call_id: String,
        result: Value,
    },
    /// Parts with an unrecognized tag land here instead of failing to
    /// deserialize; they contribute nothing to conversions.
    #[serde(other)]
    Unknown,
}

impl ContentPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn tool_call<I, N>(tool_call_id: I, tool_name: N, args: Value) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        ContentPart::ToolCall {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
        }
    }

    pub fn tool_result<I: Into<String>>(tool_call_id: I, result: Value) -> Self {
        ContentPart::ToolResult {
            tool_call_id: tool_call_id.into(),
            result,
        }
    }

    /// Get the text if this is a Text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            _ => None,
        }
    }
}
