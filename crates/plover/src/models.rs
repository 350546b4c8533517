//! These models represent the message shapes moved through the pipeline
//!
//! There are three related formats the same conversation passes through:
//! - exchange messages, sent to and received from the model provider
//! - display messages, rendered by the client with their tool invocations
//! - persisted records, owned by the chat store
//!
//! These overlap but none is a superset of the others: the exchange shape
//! carries structured content parts, the display shape folds tool results
//! onto the assistant message that requested them, and the persisted shape
//! adds identity and timestamps. Conversions between them live in
//! `crate::convert` and `crate::sanitize`; every conversion produces a new
//! sequence, nothing is mutated in place across calls.
pub mod content;
pub mod display;
pub mod message;
pub mod record;
pub mod role;
