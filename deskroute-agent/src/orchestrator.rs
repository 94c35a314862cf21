//! Clarification Policy / Orchestrator
//!
//! Drives one exchange: hands the conversation to the generation backend,
//! runs the handlers it invokes, bounds the number of backend round-trips and
//! assembles the final `{message, ticket}` pair.

use crate::extract::extract;
use crate::prompts::system_instructions;
use crate::stream::ReplyChunks;
use deskroute_core::{
    new_exchange_id, normalize_requester_id, ConversationTurn, DeskResult, ExchangeId,
    RouterConfig, Ticket, ToolExchange, DEFAULT_MAX_ROUND_TRIPS,
};
use deskroute_llm::{build_backend, BackendReply, GenerationBackend, GenerationRequest};
use deskroute_tickets::{CategoryRegistry, TicketDispatcher};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Reply used when the backend fails.
pub const APOLOGY_MESSAGE: &str = "Извините, произошла ошибка при обработке запроса.\n\n\
                                   Попробуйте переформулировать вопрос или обратитесь в поддержку.";

/// Reply used when the round-trip cap is hit before any handler ran.
pub const ROUND_TRIP_CAP_MESSAGE: &str = "Не удалось завершить обработку запроса. \
                                          Пожалуйста, опишите ситуацию подробнее или обратитесь в поддержку.";

// ============================================================================
// TYPES
// ============================================================================

/// Lifecycle of a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExchangeState {
    AwaitingInput,
    Delegating { round_trip: u32 },
    Completed,
    Failed,
}

impl ExchangeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExchangeState::Completed | ExchangeState::Failed)
    }
}

/// Inbound exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    #[serde(default)]
    pub requester_id: Option<String>,
}

impl ExchangeRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_requester(mut self, requester_id: impl Into<String>) -> Self {
        self.requester_id = Some(requester_id.into());
        self
    }
}

/// Result of a completed (or failed) exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeOutcome {
    pub exchange_id: ExchangeId,
    pub message: String,
    pub ticket: Option<Ticket>,
    pub state: ExchangeState,
    /// Backend calls made.
    pub round_trips: u32,
}

/// An outcome with the message moved into a chunk iterator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSummary {
    pub exchange_id: ExchangeId,
    pub ticket: Option<Ticket>,
    pub state: ExchangeState,
    pub round_trips: u32,
}

impl ExchangeOutcome {
    pub fn into_stream(self) -> (ExchangeSummary, ReplyChunks) {
        let summary = ExchangeSummary {
            exchange_id: self.exchange_id,
            ticket: self.ticket,
            state: self.state,
            round_trips: self.round_trips,
        };
        (summary, ReplyChunks::new(self.message))
    }
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Stateless exchange driver. Safe to share across concurrent requests.
pub struct Orchestrator {
    backend: Arc<dyn GenerationBackend>,
    dispatcher: TicketDispatcher,
    max_round_trips: u32,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: &RouterConfig) -> Self {
        Self::with_limits(backend, CategoryRegistry::standard(), config.max_round_trips)
    }

    /// Build the configured backend and wrap it.
    pub fn from_config(config: &RouterConfig) -> DeskResult<Self> {
        let backend = build_backend(&config.backend)?;
        Ok(Self::new(backend, config))
    }

    pub fn with_limits(
        backend: Arc<dyn GenerationBackend>,
        registry: CategoryRegistry,
        max_round_trips: u32,
    ) -> Self {
        Self {
            backend,
            dispatcher: TicketDispatcher::new(registry),
            max_round_trips: max_round_trips.max(1),
        }
    }

    /// Standard registry and the default round-trip cap.
    pub fn with_backend(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::with_limits(backend, CategoryRegistry::standard(), DEFAULT_MAX_ROUND_TRIPS)
    }

    pub fn provider_id(&self) -> &str {
        self.backend.provider_id()
    }

    pub fn max_round_trips(&self) -> u32 {
        self.max_round_trips
    }

    /// Process one exchange.
    ///
    /// Backend failures are absorbed into a `Failed` outcome. An invocation of
    /// an unregistered category is returned as `Err(UnknownCategory)`.
    pub async fn handle_exchange(&self, request: ExchangeRequest) -> DeskResult<ExchangeOutcome> {
        let exchange_id = new_exchange_id();
        let requester_id = normalize_requester_id(request.requester_id.as_deref());
        let span = tracing::info_span!(
            "exchange",
            %exchange_id,
            requester = %requester_id,
            provider = self.backend.provider_id()
        );

        self.run_exchange(exchange_id, requester_id, request)
            .instrument(span)
            .await
    }

    /// Process one exchange and segment the final message into word chunks.
    pub async fn handle_exchange_stream(
        &self,
        request: ExchangeRequest,
    ) -> DeskResult<(ExchangeSummary, ReplyChunks)> {
        Ok(self.handle_exchange(request).await?.into_stream())
    }

    async fn run_exchange(
        &self,
        exchange_id: ExchangeId,
        requester_id: String,
        request: ExchangeRequest,
    ) -> DeskResult<ExchangeOutcome> {
        let mut state = ExchangeState::AwaitingInput;
        tracing::debug!(history = request.history.len(), "Exchange started");

        let mut generation = GenerationRequest {
            system_instructions: system_instructions(
                self.dispatcher.factory().registry(),
                &requester_id,
            ),
            history: request.history,
            current_message: request.message,
            tools: self.dispatcher.tool_specs(),
            scratchpad: Vec::new(),
        };
        let mut fired: Vec<Ticket> = Vec::new();
        let mut round_trips = 0u32;

        let final_text = loop {
            if round_trips >= self.max_round_trips {
                tracing::warn!(round_trips, "Round-trip cap reached, completing with partial output");
                break match generation.scratchpad.last() {
                    Some(exchange) => exchange.output.clone(),
                    None => ROUND_TRIP_CAP_MESSAGE.to_string(),
                };
            }

            round_trips += 1;
            transition(&mut state, ExchangeState::Delegating { round_trip: round_trips });

            let reply = match self.backend.respond(&generation).await {
                Ok(reply) => reply,
                Err(err) => {
                    tracing::warn!(error = %err, round_trip = round_trips, "Generation backend failed");
                    transition(&mut state, ExchangeState::Failed);
                    return Ok(ExchangeOutcome {
                        exchange_id,
                        message: APOLOGY_MESSAGE.to_string(),
                        ticket: None,
                        state,
                        round_trips,
                    });
                }
            };

            match reply {
                BackendReply::Text(text) => break text,
                BackendReply::ToolCalls(calls) => {
                    for invocation in calls {
                        let (result, output) =
                            match self.dispatcher.invoke(&invocation, Some(&requester_id)) {
                                Ok(handled) => handled,
                                Err(err) => {
                                    tracing::error!(
                                        tool = %invocation.name,
                                        error = %err,
                                        "Handler invocation rejected"
                                    );
                                    return Err(err);
                                }
                            };
                        if let Some(ticket) = result.ticket {
                            fired.push(ticket);
                        }
                        generation.scratchpad.push(ToolExchange { invocation, output });
                    }
                }
            }
        };

        let (message, extracted) = extract(&final_text).into_parts();
        let ticket = resolve_ticket(extracted, &fired);
        transition(&mut state, ExchangeState::Completed);

        tracing::info!(
            round_trips,
            handlers = fired.len(),
            ticket_id = ticket.as_ref().map(|t| t.ticket_id.as_str()),
            "Exchange completed"
        );

        Ok(ExchangeOutcome {
            exchange_id,
            message,
            ticket,
            state,
            round_trips,
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.backend.provider_id())
            .field("max_round_trips", &self.max_round_trips)
            .finish()
    }
}

fn transition(state: &mut ExchangeState, next: ExchangeState) {
    tracing::debug!(from = ?state, to = ?next, "Exchange state");
    *state = next;
}

/// Pick the ticket to return.
///
/// No handler fired: no ticket, whatever the text claims. Otherwise the
/// extracted ticket wins when it decodes and names a ticket built in this
/// exchange; the last built ticket is the fallback.
fn resolve_ticket(extracted: Option<Value>, fired: &[Ticket]) -> Option<Ticket> {
    let last = fired.last()?;

    let matched = extracted
        .and_then(|value| serde_json::from_value::<Ticket>(value).ok())
        .and_then(|candidate| fired.iter().find(|t| t.ticket_id == candidate.ticket_id));

    Some(matched.unwrap_or(last).clone())
}

// =============================================================================
// TESTS
// =============================================================================
