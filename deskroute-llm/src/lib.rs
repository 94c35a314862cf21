//! Deskroute LLM - Generation Backend Contract
//!
//! Provider-agnostic trait for text and tool-calling generation, plus the
//! concrete Gemini and OpenAI-compatible adapters in [`providers`].

use async_trait::async_trait;
use deskroute_core::{ConversationTurn, DeskResult, ToolExchange, ToolInvocation, ToolSpec};
use serde::{Deserialize, Serialize};

pub mod providers;

pub use providers::{build_backend, GeminiBackend, OpenAIBackend};

// ============================================================================
// REQUEST / REPLY
// ============================================================================

/// Everything the backend sees for one round-trip of an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_instructions: String,
    /// Prior turns in chronological order.
    pub history: Vec<ConversationTurn>,
    pub current_message: String,
    pub tools: Vec<ToolSpec>,
    /// Tool calls and handler outputs made so far in this exchange.
    pub scratchpad: Vec<ToolExchange>,
}

impl GenerationRequest {
    /// History followed by the current user turn.
    pub fn transcript(&self) -> Vec<ConversationTurn> {
        let mut turns = self.history.clone();
        turns.push(ConversationTurn::user(self.current_message.clone()));
        turns
    }
}

/// What the backend produced on one round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendReply {
    /// Final text, possibly embedding a handler result.
    Text(String),
    /// One or more handler invocations to run before the next round-trip.
    ToolCalls(Vec<ToolInvocation>),
}

// ============================================================================
// BACKEND TRAIT
// ============================================================================

/// Trait for generation backends.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// struct MyBackend;
///
/// #[async_trait]
/// impl GenerationBackend for MyBackend {
///     fn provider_id(&self) -> &str { "mine" }
///     async fn respond(&self, request: &GenerationRequest) -> DeskResult<BackendReply> {
///         Ok(BackendReply::Text("Здравствуйте!".to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short provider name used in logs and errors.
    fn provider_id(&self) -> &str;

    /// Produce the next reply for the given context.
    ///
    /// # Returns
    /// * `Ok(BackendReply)` - Text or tool invocations
    /// * `Err(DeskError::GenerationUnavailable)` - Credentials, network,
    ///   timeout, quota or malformed provider response
    async fn respond(&self, request: &GenerationRequest) -> DeskResult<BackendReply>;
}

// =============================================================================
// TESTS
// =============================================================================
