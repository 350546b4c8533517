use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::ChatResult;
use crate::models::message::ExchangeMessage;

/// Messages yielded by an in-flight completion, in the order they finish
pub type MessageStream = BoxStream<'static, ChatResult<ExchangeMessage>>;

/// An opaque producer of exchange messages for a conversation. The caller
/// consumes the stream to its end and only then runs sanitize-and-persist
/// over everything it collected.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[ExchangeMessage]) -> ChatResult<MessageStream>;
}

/// Replays a fixed sequence of messages; used in tests and for offline
/// wiring of the server.
pub struct StaticProvider {
    responses: Vec<ExchangeMessage>,
}

impl StaticProvider {
    pub fn new(responses: Vec<ExchangeMessage>) -> Self {
        Self { responses }
    }
}

#[async_trait]
impl CompletionProvider for StaticProvider {
    async fn complete(&self, _messages: &[ExchangeMessage]) -> ChatResult<MessageStream> {
        let responses = self.responses.clone();
        Ok(Box::pin(async_stream::stream! {
            for message in responses {
                yield Ok(message);
            }
        }))
    }
}
