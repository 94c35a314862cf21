//! Deskroute Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

pub mod config;
pub mod conversation;
pub mod enums;
pub mod error;
pub mod identity;
pub mod llm;
pub mod ticket;

pub use config::{BackendConfig, ProviderKind, RouterConfig, DEFAULT_MAX_ROUND_TRIPS};
pub use conversation::ConversationTurn;
pub use enums::{Category, CategoryParseError, Priority, Role, TicketStatus};
pub use error::{ConfigError, DeskError, DeskResult, LlmError};
pub use identity::{
    compute_content_hash, format_ticket_id, new_exchange_id, normalize_requester_id,
    ticket_number, ContentHash, ExchangeId, Timestamp, UNKNOWN_REQUESTER,
};
pub use llm::{ToolExchange, ToolInvocation, ToolSpec};
pub use ticket::{HandlerResult, Ticket, MISSING_INPUT_PLACEHOLDER};
