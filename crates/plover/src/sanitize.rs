use std::collections::HashSet;

use crate::models::content::ContentPart;
use crate::models::display::DisplayMessage;
use crate::models::message::{ExchangeMessage, MessageContent};
use crate::models::role::Role;

/// Strip a completed model response of content that must not be persisted:
/// tool calls whose result never arrived and empty text parts, then any
/// message left with no content at all.
///
/// A response stream can end mid tool cycle, leaving an assistant message
/// that references a call with no result in the batch. Replaying such a
/// call from storage would present it as pending forever, so it is removed
/// here. Tool-role messages are the source of result ids and pass through
/// unfiltered; plain-string content is never filtered.
pub fn sanitize_response_messages(messages: Vec<ExchangeMessage>) -> Vec<ExchangeMessage> {
    let result_ids: HashSet<String> = messages
        .iter()
        .filter(|message| message.role == Role::Tool)
        .flat_map(|message| message.content.parts())
        .filter_map(|part| match part {
            ContentPart::ToolResult { tool_call_id, .. } => Some(tool_call_id.clone()),
            _ => None,
        })
        .collect();

    messages
        .into_iter()
        .map(|mut message| {
            if message.role != Role::Assistant {
                return message;
            }
            if let MessageContent::Parts(parts) = &mut message.content {
                parts.retain(|part| match part {
                    ContentPart::ToolCall { tool_call_id, .. } => {
                        result_ids.contains(tool_call_id)
                    }
                    ContentPart::Text { text } => !text.is_empty(),
                    _ => true,
                });
            }
            message
        })
        .filter(|message| !message.content.is_empty())
        .collect()
}

/// Strip a display conversation of anything unrenderable: invocations still
/// waiting for a result, then assistant messages left with neither text nor
/// invocations.
///
/// Each message is judged on its own; an invocation only survives once its
/// result has been attached to it. Unresolved calls are dropped even if a
/// result exists elsewhere in the conversation, matching how the client
/// treats in-flight calls at render time.
pub fn sanitize_display_messages(messages: Vec<DisplayMessage>) -> Vec<DisplayMessage> {
    messages
        .into_iter()
        .map(|mut message| {
            if message.role == Role::Assistant {
                message
                    .tool_invocations
                    .retain(|invocation| invocation.is_result());
            }
            message
        })
        .filter(|message| !message.content.is_empty() || !message.tool_invocations.is_empty())
        .collect()
}
