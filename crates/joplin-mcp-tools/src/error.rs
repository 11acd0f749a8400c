//! Tool failures and their mapping onto MCP errors.

use joplin_mcp_client::ClientError;
use joplin_mcp_core::ValidationError;
use rmcp::ErrorData;
use thiserror::Error;

/// Why a tool call failed
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller-supplied parameters were rejected before any backend call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The Joplin Data API failed or was unreachable
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A backend record did not have the expected shape
    #[error("unexpected Joplin record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ToolError> for ErrorData {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::Validation(e) => ErrorData::invalid_params(e.to_string(), None),
            other => ErrorData::internal_error(other.to_string(), None),
        }
    }
}

/// Result type for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;
