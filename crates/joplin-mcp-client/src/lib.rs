//! # joplin-mcp client
//!
//! Thin async wrapper around the Joplin Data API (the desktop app's Web
//! Clipper service). It handles token injection, status checking and JSON
//! decoding; it knows nothing about notes or folders beyond their paths.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;

pub use client::{BinaryBody, JoplinClient, Query};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{BackendError, ClientError, Result};
pub use reqwest::Method;
