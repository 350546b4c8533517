use serde_json::Value;

use crate::identifier::generate_id;
use crate::models::content::ContentPart;
use crate::models::display::{DisplayMessage, ToolInvocation};
use crate::models::message::{ExchangeMessage, MessageContent};
use crate::models::role::Role;

/// Fold a model-exchange conversation into the shape the client renders.
///
/// Tool-role messages never appear in the output; each of their results is
/// attached to the matching call-state invocation on an already-emitted
/// message. A result with no matching invocation is dropped. Every other
/// message becomes exactly one display message, in order, reusing its id
/// when it has one.
pub fn convert_to_display(messages: &[ExchangeMessage]) -> Vec<DisplayMessage> {
    let mut display: Vec<DisplayMessage> = Vec::new();

    for message in messages {
        if message.role == Role::Tool {
            attach_tool_results(message, &mut display);
            continue;
        }

        let mut text = String::new();
        let mut invocations = Vec::new();
        match &message.content {
            MessageContent::Text(content) => text.push_str(content),
            MessageContent::Parts(parts) => {
                for part in parts {
                    match part {
                        ContentPart::Text { text: part_text } => text.push_str(part_text),
                        ContentPart::ToolCall {
                            tool_call_id,
                            tool_name,
                            args,
                        } => invocations.push(ToolInvocation::Call {
                            tool_call_id: tool_call_id.clone(),
                            tool_name: tool_name.clone(),
                            args: args.clone(),
                        }),
                        _ => {}
                    }
                }
            }
        }

        display.push(DisplayMessage {
            id: message.id.clone().unwrap_or_else(generate_id),
            role: message.role,
            content: text,
            tool_invocations: invocations,
        });
    }

    display
}

fn attach_tool_results(message: &ExchangeMessage, display: &mut [DisplayMessage]) {
    for part in message.content.parts() {
        if let ContentPart::ToolResult {
            tool_call_id,
            result,
        } = part
        {
            resolve_invocations(display, tool_call_id, result);
        }
    }
}

fn resolve_invocations(display: &mut [DisplayMessage], tool_call_id: &str, result: &Value) {
    for message in display.iter_mut() {
        for invocation in message.tool_invocations.iter_mut() {
            if invocation.tool_call_id() == tool_call_id {
                invocation.resolve(result.clone());
            }
        }
    }
}
