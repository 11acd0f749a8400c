//! Shared state handed to every MCP session.

use joplin_mcp_client::{ClientConfig, ClientError, JoplinClient};
use joplin_mcp_config::Settings;
use std::sync::Arc;

/// Settings plus the one Joplin client all sessions share.
///
/// Cloning is cheap; clones point at the same connection pool.
#[derive(Clone, Debug)]
pub struct AppContext {
    settings: Arc<Settings>,
    client: Arc<JoplinClient>,
}

impl AppContext {
    /// Wrap an existing client.
    pub fn new(settings: Arc<Settings>, client: Arc<JoplinClient>) -> Self {
        Self { settings, client }
    }

    /// Build the Joplin client described by `settings`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn from_settings(settings: Settings) -> Result<Self, ClientError> {
        let config = ClientConfig::builder()
            .base_url(settings.joplin_base_url.as_str())
            .token(settings.joplin_token.clone())
            .timeout(settings.http_timeout())
            .build();
        let client = JoplinClient::with_config(config)?;

        Ok(Self::new(Arc::new(settings), Arc::new(client)))
    }

    /// Runtime settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Joplin Data API client
    pub fn client(&self) -> &JoplinClient {
        &self.client
    }

    /// Shared handle to the client, for closing it at shutdown.
    pub fn client_handle(&self) -> Arc<JoplinClient> {
        Arc::clone(&self.client)
    }
}
