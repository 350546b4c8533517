use uuid::Uuid;

/// Generate a fresh message identifier.
///
/// Canonical hyphenated v4 form: 36 lowercase hex characters grouped
/// 8-4-4-4-12, version nibble `4`, variant nibble in `8..=b`. This is a
/// uniqueness aid for locally-created messages, not a security token.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
