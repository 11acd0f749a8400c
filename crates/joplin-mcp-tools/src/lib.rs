//! # joplin-mcp tools
//!
//! The MCP surface of joplin-mcp: one [`JoplinServer`] handler exposing tools
//! for notes, folders, tags, attachments and search, plus two readable
//! resources (`joplin-note://{note_id}` and `joplin-folders://tree`).
//!
//! Each tool validates its parameters, applies defaults, makes one or more
//! Joplin Data API calls through the shared client and returns the result as
//! JSON text content. Validation failures map to `invalid_params`; backend and
//! network failures to `internal_error`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attachments;
pub mod context;
pub mod error;
pub mod folders;
pub mod notes;
pub mod resources;
pub mod search;
pub mod server;
pub mod tags;
mod utils;

pub use context::AppContext;
pub use error::{ToolError, ToolResult};
pub use server::JoplinServer;
