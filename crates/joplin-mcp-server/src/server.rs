use crate::auth::{require_api_key, ApiKey};
use crate::routes::health_routes;
use crate::{Result, ServerError};
use axum::{middleware, Router};
use joplin_mcp_tools::{AppContext, JoplinServer};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, tower::StreamableHttpService,
};
use rmcp::transport::StreamableHttpServerConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Mount point of the MCP transport
pub const MCP_PATH: &str = "/mcp";

/// Build the full application: health, the gated MCP endpoint and the
/// `x-api-key` middleware.
pub fn build_router(context: AppContext) -> Router {
    let api_key = ApiKey::new(context.settings().mcp_api_key.as_str());
    let handler = JoplinServer::new(context);

    let mcp = StreamableHttpService::new(
        move || Ok(handler.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .nest_service(MCP_PATH, mcp)
        .merge(health_routes())
        .layer(middleware::from_fn_with_state(api_key, require_api_key))
}

/// Serve until Ctrl-C or SIGTERM, then close the Joplin client.
pub async fn start_server(context: AppContext) -> Result<()> {
    let address = context.settings().bind_address();
    let addr: SocketAddr = address.parse().map_err(|source| ServerError::Address {
        address: address.clone(),
        source,
    })?;

    let client = context.client_handle();
    let app = build_router(context);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    info!("Starting MCP server on http://{}{}", addr, MCP_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("MCP server stopped");

    match Arc::try_unwrap(client) {
        Ok(client) => client.close(),
        Err(_) => warn!("Joplin client still in use at shutdown; leaving it to drop"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
