//! Deskroute API Server Entry Point

use std::sync::Arc;

use deskroute_agent::Orchestrator;
use deskroute_api::{create_api_router, init_tracing, ApiConfig, ApiError, ApiResult, AppState};
use deskroute_core::RouterConfig;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let api_config = ApiConfig::from_env()?;
    init_tracing(api_config.log_json)?;

    let router_config = RouterConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid router configuration");
        ApiError::from(e)
    })?;
    let orchestrator = Orchestrator::from_config(&router_config)?;
    tracing::info!(
        provider = orchestrator.provider_id(),
        model = %router_config.backend.model,
        max_round_trips = orchestrator.max_round_trips(),
        "Orchestrator ready"
    );

    let app = create_api_router(AppState::new(Arc::new(orchestrator)), &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting Deskroute API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
