//! The MCP server handler: every tool plus the readable resources.

use crate::context::AppContext;
use crate::resources;
use joplin_mcp_client::JoplinClient;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::model::{
    Implementation, ListResourceTemplatesResult, ListResourcesResult, PaginatedRequestParams,
    ProtocolVersion, ReadResourceRequestParams, ReadResourceResult, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{tool_handler, RoleServer, ServerHandler};
use tracing::debug;

const INSTRUCTIONS: &str = "Access and manage Joplin notes via the local Joplin Data API \
    (Web Clipper). Use tools for CRUD operations on notes, folders, tags and attachments, \
    and resources to load note content or the folder tree.";

/// MCP handler exposing the Joplin Data API.
///
/// One instance is created per MCP session; all of them share the
/// [`AppContext`] and therefore one connection pool.
#[derive(Clone)]
pub struct JoplinServer {
    context: AppContext,
    tool_router: ToolRouter<Self>,
}

impl JoplinServer {
    /// Create a handler with every tool registered.
    #[must_use]
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            tool_router: Self::note_tools()
                + Self::folder_tools()
                + Self::tag_tools()
                + Self::attachment_tools()
                + Self::search_tools(),
        }
    }

    /// Shared application context
    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Names of all registered tools, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        names
    }

    pub(crate) fn client(&self) -> &JoplinClient {
        self.context.client()
    }
}

#[tool_handler]
impl ServerHandler for JoplinServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "joplin-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, rmcp::ErrorData> {
        Ok(ListResourcesResult {
            resources: resources::static_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, rmcp::ErrorData> {
        Ok(ListResourceTemplatesResult {
            resource_templates: resources::resource_templates(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, rmcp::ErrorData> {
        debug!(uri = %request.uri, "read_resource");
        resources::read_resource(self.client(), &request.uri).await
    }
}
