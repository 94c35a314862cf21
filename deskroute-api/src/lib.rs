//! Deskroute API - HTTP chat transport
//!
//! Thin axum layer over the orchestrator: request parsing, error mapping,
//! SSE streaming and tracing setup. No authentication and no ticket storage.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use state::AppState;
pub use telemetry::init_tracing;
