use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::role::Role;

/// State of a tool call as the client sees it: requested, or resolved with
/// its result. An invocation moves from Call to Result, never back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ToolInvocation {
    #[serde(rename_all = "camelCase")]
    Call {
        tool_call_id: String,
        tool_name: String,
        args: Value,
    },
    #[serde(rename_all = "camelCase")]
    Result {
        tool_call_id: String,
        tool_name: String,
        args: Value,
        result: Value,
    },
}

impl ToolInvocation {
    pub fn tool_call_id(&self) -> &str {
        match self {
            ToolInvocation::Call { tool_call_id, .. } => tool_call_id,
            ToolInvocation::Result { tool_call_id, .. } => tool_call_id,
        }
    }

    pub fn is_result(&self) -> bool {
        matches!(self, ToolInvocation::Result { .. })
    }

    /// Attach a result, transitioning Call to Result. A resolved invocation
    /// keeps its original result.
    pub fn resolve(&mut self, result: Value) {
        if let ToolInvocation::Call {
            tool_call_id,
            tool_name,
            args,
        } = self
        {
            *self = ToolInvocation::Result {
                tool_call_id: std::mem::take(tool_call_id),
                tool_name: std::mem::take(tool_name),
                args: std::mem::take(args),
                result,
            };
        }
    }
}

/// A message in the shape the client renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub tool_invocations: Vec<ToolInvocation>,
}
