//! Chat endpoints
//!
//! - POST /api/chat - one exchange, full reply
//! - POST /api/chat/stream - one exchange, reply as server-sent word chunks

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use deskroute_agent::ExchangeRequest;
use deskroute_core::{normalize_requester_id, ConversationTurn, Ticket};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Terminal event payload of the stream.
pub const STREAM_DONE: &str = "[DONE]";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    #[serde(default)]
    pub student_id: Option<String>,
}

impl ChatRequest {
    fn into_exchange(self) -> ApiResult<ExchangeRequest> {
        if self.message.trim().is_empty() {
            return Err(ApiError::missing_field("message"));
        }
        Ok(ExchangeRequest {
            message: self.message,
            history: self.history,
            requester_id: self.student_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
}

#[derive(Debug, Serialize)]
struct ChunkEvent<'a> {
    chunk: &'a str,
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let student_id = normalize_requester_id(body.student_id.as_deref());
    let outcome = state
        .orchestrator
        .handle_exchange(body.into_exchange()?)
        .await?;

    Ok(Json(ChatResponse {
        response: outcome.message,
        student_id,
        ticket: outcome.ticket,
    }))
}

pub async fn chat_stream(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let (summary, chunks) = state
        .orchestrator
        .handle_exchange_stream(body.into_exchange()?)
        .await?;

    tracing::debug!(
        exchange_id = %summary.exchange_id,
        has_ticket = summary.ticket.is_some(),
        "Streaming reply"
    );

    let events = chunks
        .map(|chunk| Ok(chunk_event(&chunk)))
        .chain(std::iter::once(Ok(Event::default().data(STREAM_DONE))));

    Ok(Sse::new(stream::iter(events)))
}

fn chunk_event(chunk: &str) -> Event {
    match Event::default().json_data(ChunkEvent { chunk }) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode stream chunk");
            Event::default().comment("encoding error")
        }
    }
}
