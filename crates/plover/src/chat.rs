use crate::models::message::ExchangeMessage;
use crate::models::role::Role;

const MAX_TITLE_CHARS: usize = 80;

/// The user message that initiated the current turn, if any
pub fn most_recent_user_message(messages: &[ExchangeMessage]) -> Option<&ExchangeMessage> {
    messages.iter().rev().find(|m| m.role == Role::User)
}

/// Derive a chat title from its opening user message: first line, capped
pub fn title_for_chat(message: &ExchangeMessage) -> String {
    let text = message.text();
    let line = text.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return "New chat".to_string();
    }
    let mut title: String = line.chars().take(MAX_TITLE_CHARS).collect();
    if line.chars().count() > MAX_TITLE_CHARS {
        title.push_str("...");
    }
    title
}
