//! # joplin-mcp configuration
//!
//! Settings for the MCP server and the Joplin Data API client, read from the
//! process environment and, optionally, a local `.env` file.
//!
//! ```rust,no_run
//! use joplin_mcp_config::Settings;
//!
//! let settings = Settings::load(Some(std::path::Path::new(".env")))?;
//! println!("binding {}", settings.bind_address());
//! # Ok::<(), joplin_mcp_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod settings;

pub use error::{ConfigError, Result};
pub use settings::*;
