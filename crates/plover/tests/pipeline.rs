use std::collections::HashSet;

use plover::convert::convert_to_display;
use plover::identifier::generate_id;
use plover::models::content::ContentPart;
use plover::models::display::ToolInvocation;
use plover::models::message::ExchangeMessage;
use plover::models::record::PersistedMessage;
use plover::models::role::Role;
use plover::sanitize::{sanitize_display_messages, sanitize_response_messages};
use plover::store::{ChatStore, MemoryStore};
use serde_json::json;

fn assert_canonical_v4(id: &str) {
    assert_eq!(id.len(), 36, "bad length: {}", id);
    for (i, c) in id.char_indices() {
        match i {
            8 | 13 | 18 | 23 => assert_eq!(c, '-', "missing hyphen in {}", id),
            14 => assert_eq!(c, '4', "bad version nibble in {}", id),
            19 => assert!(
                matches!(c, '8' | '9' | 'a' | 'b'),
                "bad variant nibble in {}",
                id
            ),
            _ => assert!(
                c.is_ascii_hexdigit() && !c.is_ascii_uppercase(),
                "bad character {:?} in {}",
                c,
                id
            ),
        }
    }
}

#[test]
fn generated_ids_are_unique_and_well_formed() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let id = generate_id();
        assert_canonical_v4(&id);
        assert!(seen.insert(id), "duplicate identifier generated");
    }
}

#[test]
fn pairing_invariant_holds_across_the_conversation() {
    let messages = vec![
        ExchangeMessage::assistant()
            .with_tool_call("resolved", "lookup", json!({}))
            .with_tool_call("pending", "lookup", json!({})),
        ExchangeMessage::assistant().with_text("meanwhile"),
        ExchangeMessage::tool().with_tool_result("resolved", json!({"hits": 3})),
    ];

    let display = convert_to_display(&messages);
    assert_eq!(display.len(), 2, "tool messages must not be emitted");

    let states: Vec<(String, bool)> = display[0]
        .tool_invocations
        .iter()
        .map(|i| (i.tool_call_id().to_string(), i.is_result()))
        .collect();
    assert_eq!(
        states,
        vec![
            ("resolved".to_string(), true),
            ("pending".to_string(), false)
        ]
    );
}

#[test]
fn converter_preserves_order_and_non_tool_count() {
    let messages = vec![
        ExchangeMessage::user().with_text("question"),
        ExchangeMessage::assistant().with_tool_call("t1", "lookup", json!({})),
        ExchangeMessage::tool().with_tool_result("t1", json!("answer")),
        ExchangeMessage::assistant().with_text("summary"),
    ];
    let display = convert_to_display(&messages);
    let roles: Vec<Role> = display.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant]);
}

#[test]
fn no_orphan_calls_survive_sanitizing() {
    let messages = vec![
        ExchangeMessage::assistant()
            .with_tool_call("kept", "lookup", json!({}))
            .with_tool_call("orphan", "lookup", json!({})),
        ExchangeMessage::tool().with_tool_result("kept", json!(null)),
    ];
    let result_ids: HashSet<String> = messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .flat_map(|m| m.content.parts())
        .filter_map(|part| match part {
            ContentPart::ToolResult { tool_call_id, .. } => Some(tool_call_id.clone()),
            _ => None,
        })
        .collect();

    for message in sanitize_response_messages(messages) {
        for part in message.content.parts() {
            if let ContentPart::ToolCall { tool_call_id, .. } = part {
                assert!(result_ids.contains(tool_call_id));
            }
        }
    }
}

#[test]
fn no_empty_messages_survive_either_sanitizer() {
    let response = vec![
        ExchangeMessage::assistant().with_text(""),
        ExchangeMessage::assistant().with_plain_text(""),
    ];
    assert!(sanitize_response_messages(response).is_empty());

    let display = convert_to_display(&[ExchangeMessage::assistant()
        .with_tool_call("t1", "lookup", json!({}))]);
    assert!(sanitize_display_messages(display).is_empty());
}

// Scenario A: a call followed by its result folds into one resolved invocation.
#[test]
fn scenario_a_call_and_result_fold_into_one_message() {
    let messages = vec![
        ExchangeMessage::assistant().with_tool_call("t1", "get_weather", json!({})),
        ExchangeMessage::tool().with_tool_result("t1", json!("sunny")),
    ];

    let display = convert_to_display(&messages);
    assert_eq!(display.len(), 1);
    assert_eq!(
        display[0].tool_invocations,
        vec![ToolInvocation::Result {
            tool_call_id: "t1".to_string(),
            tool_name: "get_weather".to_string(),
            args: json!({}),
            result: json!("sunny"),
        }]
    );
}

// Scenario B: the same response with the tool message lost must persist nothing.
#[test]
fn scenario_b_truncated_response_persists_nothing() {
    let messages = vec![ExchangeMessage::assistant().with_tool_call("t1", "get_weather", json!({}))];
    assert!(sanitize_response_messages(messages).is_empty());
}

// Scenario C: empty text is dropped but a matched call is kept.
#[test]
fn scenario_c_empty_text_dropped_matched_call_kept() {
    let messages = vec![
        ExchangeMessage::assistant()
            .with_text("")
            .with_tool_call("t2", "get_weather", json!({})),
        ExchangeMessage::tool().with_tool_result("t2", json!("sunny")),
    ];

    let sanitized = sanitize_response_messages(messages);
    assert_eq!(
        sanitized[0].content.parts(),
        &[ContentPart::tool_call("t2", "get_weather", json!({}))]
    );
}

// Persisted history replayed through the converter keeps ids and pairings.
#[tokio::test]
async fn persisted_history_replays_through_the_converter() {
    let store = MemoryStore::new();
    let response = vec![
        ExchangeMessage::assistant().with_tool_call("t1", "get_weather", json!({"city": "Oslo"})),
        ExchangeMessage::tool().with_tool_result("t1", json!("sunny")),
        ExchangeMessage::assistant().with_text("It is sunny in Oslo."),
    ];
    let records: Vec<PersistedMessage> = sanitize_response_messages(response)
        .iter()
        .map(|m| PersistedMessage::from_exchange("chat-1", m))
        .collect();
    store.save_messages(records).await.unwrap();

    let history: Vec<ExchangeMessage> = store
        .messages_for_chat("chat-1")
        .await
        .unwrap()
        .iter()
        .map(|r| r.to_exchange())
        .collect();
    let display = convert_to_display(&history);

    assert_eq!(display.len(), 2);
    assert!(display[0].tool_invocations[0].is_result());
    assert_eq!(display[1].content, "It is sunny in Oslo.");
    // Identity carried over from the stored records
    assert_eq!(display[0].id, history[0].id.clone().unwrap());
}
