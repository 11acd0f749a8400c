//! # joplin-mcp core
//!
//! Backend-independent building blocks shared by the joplin-mcp crates:
//!
//! - **Models**: typed projections of Joplin Data API records (`Note`, `Folder`,
//!   `Tag`, `Resource`) plus the derived `FolderNode`, `ResourceBlob` and
//!   `PagedResult` shapes returned to MCP callers.
//! - **Tree builder**: turns a flat folder listing into a nested hierarchy.
//! - **Resource links**: appends or strips `:/id` Markdown links in note bodies.
//! - **Field selection / paging**: normalization and validation of the
//!   `fields`, `page` and `limit` query parameters.
//!
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fields;
pub mod links;
pub mod models;
pub mod paging;
pub mod tree;

pub use error::ValidationError;
pub use fields::parse_fields;
pub use links::{attach_resource_link, detach_resource_link, resource_link};
pub use models::{from_record, Folder, FolderNode, JsonObject, Note, Resource, ResourceBlob, Tag};
pub use paging::{PageRequest, PagedResult, MAX_PAGE, MAX_PAGE_LIMIT};
pub use tree::build_folder_tree;
