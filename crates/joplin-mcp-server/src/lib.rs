//! HTTP edge for joplin-mcp.
//!
//! Serves the MCP streamable HTTP transport at `/mcp` behind an `x-api-key`
//! gate, plus an unauthenticated `GET /health`.

pub mod auth;
pub mod cli;
pub mod routes;
pub mod server;

mod error;

pub use error::{Result, ServerError};
pub use server::{build_router, start_server};
