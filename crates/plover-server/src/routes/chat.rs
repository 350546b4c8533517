use axum::{
    extract::{Path, Query, State},
    http::{self, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use futures::{stream::StreamExt, Stream};
use plover::{
    chat::{most_recent_user_message, title_for_chat},
    convert::convert_to_display,
    errors::ChatError,
    models::content::ContentPart,
    models::display::{DisplayMessage, ToolInvocation},
    models::message::{ExchangeMessage, MessageContent},
    models::record::{Chat, PersistedMessage},
    models::role::Role,
    sanitize::sanitize_response_messages,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::state::AppState;

// Types matching the incoming JSON structure
#[derive(Debug, Deserialize)]
struct ChatRequest {
    id: String,
    messages: Vec<DisplayMessage>,
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    id: Option<String>,
}

// Custom SSE response type that implements the Vercel AI SDK data protocol
pub struct SseResponse {
    rx: ReceiverStream<String>,
}

impl SseResponse {
    fn new(rx: ReceiverStream<String>) -> Self {
        Self { rx }
    }
}

impl Stream for SseResponse {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx)
            .poll_next(cx)
            .map(|opt| opt.map(|s| Ok(Bytes::from(s))))
    }
}

impl IntoResponse for SseResponse {
    fn into_response(self) -> axum::response::Response {
        let body = axum::body::Body::from_stream(self);

        http::Response::builder()
            .header("Content-Type", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .header("Connection", "keep-alive")
            .header("x-vercel-ai-data-stream", "v1")
            .body(body)
            .unwrap()
    }
}

// The bearer token stands in for the caller's user id; verification is an
// upstream concern.
fn bearer_user(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// Expand the client's display-shape history back into exchange messages for
// the provider. Each resolved invocation replays as a complete call/result
// cycle; unresolved invocations are not replayed.
fn convert_to_exchange(incoming: &[DisplayMessage]) -> Vec<ExchangeMessage> {
    let mut messages = Vec::new();

    for msg in incoming {
        match msg.role {
            Role::User => {
                messages.push(
                    ExchangeMessage::user()
                        .with_id(&msg.id)
                        .with_text(&msg.content),
                );
            }
            Role::Assistant => {
                for invocation in &msg.tool_invocations {
                    if let ToolInvocation::Result {
                        tool_call_id,
                        tool_name,
                        args,
                        result,
                    } = invocation
                    {
                        messages.push(ExchangeMessage::assistant().with_tool_call(
                            tool_call_id,
                            tool_name,
                            args.clone(),
                        ));
                        messages.push(
                            ExchangeMessage::tool().with_tool_result(tool_call_id, result.clone()),
                        );
                    }
                }

                if !msg.content.is_empty() {
                    messages.push(
                        ExchangeMessage::assistant()
                            .with_id(&msg.id)
                            .with_text(&msg.content),
                    );
                }
            }
            Role::Tool => {
                tracing::warn!("client supplied a tool-role message, ignoring");
            }
        }
    }

    messages
}

// Protocol-specific message formatting
struct ProtocolFormatter;

impl ProtocolFormatter {
    fn format_text(text: &str) -> String {
        let encoded_text = serde_json::to_string(text).unwrap_or_else(|_| String::new());
        format!("0:{}\n", encoded_text)
    }

    fn format_tool_call(id: &str, name: &str, args: &Value) -> String {
        // Tool calls start with "9:"
        let tool_call = json!({
            "toolCallId": id,
            "toolName": name,
            "args": args
        });
        format!("9:{}\n", tool_call)
    }

    fn format_tool_result(id: &str, result: &Value) -> String {
        // Tool results start with "a:"
        let response = json!({
            "toolCallId": id,
            "result": result,
        });
        format!("a:{}\n", response)
    }

    fn format_finish(reason: &str) -> String {
        // Finish messages start with "d:"
        let finish = json!({
            "finishReason": reason,
            "usage": {
                "promptTokens": 0,
                "completionTokens": 0
            }
        });
        format!("d:{}\n", finish)
    }
}

async fn stream_message(
    message: &ExchangeMessage,
    tx: &mpsc::Sender<String>,
) -> Result<(), mpsc::error::SendError<String>> {
    match message.role {
        Role::Tool => {
            for part in message.content.parts() {
                if let ContentPart::ToolResult {
                    tool_call_id,
                    result,
                } = part
                {
                    tx.send(ProtocolFormatter::format_tool_result(tool_call_id, result))
                        .await?;
                }
            }
        }
        Role::Assistant => match &message.content {
            MessageContent::Text(text) => {
                for line in text.lines() {
                    tx.send(ProtocolFormatter::format_text(&format!("{}\n", line)))
                        .await?;
                }
            }
            MessageContent::Parts(parts) => {
                for part in parts {
                    match part {
                        ContentPart::Text { text } => {
                            for line in text.lines() {
                                tx.send(ProtocolFormatter::format_text(&format!("{}\n", line)))
                                    .await?;
                            }
                        }
                        ContentPart::ToolCall {
                            tool_call_id,
                            tool_name,
                            args,
                        } => {
                            tx.send(ProtocolFormatter::format_tool_call(
                                tool_call_id,
                                tool_name,
                                args,
                            ))
                            .await?;
                        }
                        _ => {}
                    }
                }
            }
        },
        // The protocol carries no user messages back to the client
        Role::User => {}
    }
    Ok(())
}

fn store_failure(err: ChatError) -> StatusCode {
    tracing::error!("Store failure: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<SseResponse, StatusCode> {
    let user_id = bearer_user(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let conversation = convert_to_exchange(&request.messages);
    let user_message = most_recent_user_message(&conversation)
        .cloned()
        .ok_or(StatusCode::BAD_REQUEST)?;

    if state
        .store
        .get_chat(&request.id)
        .await
        .map_err(store_failure)?
        .is_none()
    {
        let chat = Chat {
            id: request.id.clone(),
            user_id,
            title: title_for_chat(&user_message),
            created_at: Utc::now(),
        };
        state.store.save_chat(chat).await.map_err(store_failure)?;
    }

    state
        .store
        .save_messages(vec![PersistedMessage::from_exchange(
            &request.id,
            &user_message,
        )])
        .await
        .map_err(store_failure)?;

    // Create channel for streaming
    let (tx, rx) = mpsc::channel(100);
    let stream = ReceiverStream::new(rx);

    let store = state.store.clone();
    let provider = state.provider.clone();
    let chat_id = request.id;

    // Spawn task to handle streaming
    tokio::spawn(async move {
        let mut response = match provider.complete(&conversation).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Failed to start completion: {}", e);
                // Send a finish message with error as the reason
                let _ = tx.send(ProtocolFormatter::format_finish("error")).await;
                return;
            }
        };

        let mut collected: Vec<ExchangeMessage> = Vec::new();
        while let Some(item) = response.next().await {
            match item {
                Ok(message) => {
                    if let Err(e) = stream_message(&message, &tx).await {
                        tracing::error!("Error sending message through channel: {}", e);
                        break;
                    }
                    collected.push(message);
                }
                Err(e) => {
                    tracing::error!("Error processing message: {}", e);
                    break;
                }
            }
        }

        // Send finish message
        let _ = tx.send(ProtocolFormatter::format_finish("stop")).await;

        // The client already has the full stream; a persistence failure
        // stays on this side of it.
        let records: Vec<PersistedMessage> = sanitize_response_messages(collected)
            .iter()
            .map(|message| PersistedMessage::from_exchange(&chat_id, message))
            .collect();
        if records.is_empty() {
            return;
        }
        if let Err(e) = store.save_messages(records).await {
            tracing::error!("Failed to save chat {}: {}", chat_id, e);
        }
    });

    Ok(SseResponse::new(stream))
}

async fn delete_chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DeleteParams>,
) -> StatusCode {
    let Some(id) = params.id else {
        return StatusCode::NOT_FOUND;
    };
    let Some(user_id) = bearer_user(&headers) else {
        return StatusCode::UNAUTHORIZED;
    };

    match state.store.get_chat(&id).await {
        Ok(Some(chat)) => {
            if chat.user_id != user_id {
                return StatusCode::UNAUTHORIZED;
            }
            match state.store.delete_chat(&id).await {
                Ok(()) => StatusCode::OK,
                Err(e) => store_failure(e),
            }
        }
        Ok(None) => StatusCode::NOT_FOUND,
        Err(e) => store_failure(e),
    }
}

async fn messages_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<DisplayMessage>>, StatusCode> {
    let user_id = bearer_user(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let chat = state
        .store
        .get_chat(&id)
        .await
        .map_err(store_failure)?
        .ok_or(StatusCode::NOT_FOUND)?;
    if chat.user_id != user_id {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let history: Vec<ExchangeMessage> = state
        .store
        .messages_for_chat(&id)
        .await
        .map_err(store_failure)?
        .iter()
        .map(|record| record.to_exchange())
        .collect();

    Ok(Json(convert_to_display(&history)))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler).delete(delete_chat_handler))
        .route("/chat/:id/messages", get(messages_handler))
        .with_state(state)
}
