//! Deskroute Agent - Exchange Orchestration
//!
//! Decides per exchange whether the backend answers directly or delegates to
//! a category handler, bounds the delegation round-trips, and turns the
//! backend's final text into a `{message, ticket}` pair.

pub mod extract;
pub mod orchestrator;
pub mod prompts;
pub mod stream;

pub use extract::{extract, Extraction};
pub use orchestrator::{
    ExchangeOutcome, ExchangeRequest, ExchangeState, ExchangeSummary, Orchestrator,
    APOLOGY_MESSAGE, ROUND_TRIP_CAP_MESSAGE,
};
pub use prompts::system_instructions;
pub use stream::ReplyChunks;
