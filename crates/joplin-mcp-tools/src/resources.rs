//! Readable MCP resources
//!
//! - `joplin-note://{note_id}`: a note rendered as Markdown with its title as
//!   a level-one heading
//! - `joplin-folders://tree`: the folder hierarchy as JSON

use crate::error::ToolError;
use crate::folders::folder_tree;
use crate::notes::get_note;
use joplin_mcp_client::JoplinClient;
use joplin_mcp_core::Note;
use rmcp::model::{
    AnnotateAble, RawResource, RawResourceTemplate, ReadResourceResult, Resource,
    ResourceContents, ResourceTemplate,
};
use rmcp::ErrorData;
use tracing::debug;

/// Scheme prefix of note resources
pub const NOTE_URI_PREFIX: &str = "joplin-note://";
/// URI template advertised for note resources
pub const NOTE_URI_TEMPLATE: &str = "joplin-note://{note_id}";
/// URI of the folder tree resource
pub const FOLDER_TREE_URI: &str = "joplin-folders://tree";

const NOTE_FIELDS: &str = "id,title,body,updated_time,created_time,parent_id";
const UNTITLED: &str = "(untitled)";

/// A recognized resource URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUri<'a> {
    /// `joplin-note://{note_id}`
    Note(&'a str),
    /// `joplin-folders://tree`
    FolderTree,
}

impl<'a> ResourceUri<'a> {
    /// Recognize one of the served URIs.
    pub fn parse(uri: &'a str) -> Option<Self> {
        if uri == FOLDER_TREE_URI {
            return Some(Self::FolderTree);
        }
        uri.strip_prefix(NOTE_URI_PREFIX)
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .map(Self::Note)
    }
}

/// Resources with a fixed URI
pub fn static_resources() -> Vec<Resource> {
    let mut tree = RawResource::new(FOLDER_TREE_URI, "folders-tree");
    tree.description = Some("Folder (notebook) hierarchy as nested JSON".to_string());
    tree.mime_type = Some("application/json".to_string());
    vec![tree.no_annotation()]
}

/// Parameterized resources
pub fn resource_templates() -> Vec<ResourceTemplate> {
    let note = RawResourceTemplate {
        uri_template: NOTE_URI_TEMPLATE.to_string(),
        name: "note".to_string(),
        title: None,
        description: Some("A note's Markdown body, headed by its title".to_string()),
        mime_type: Some("text/markdown".to_string()),
        icons: None,
    };
    vec![note.no_annotation()]
}

/// `# {title}\n\n{body}`, with an empty title shown as `(untitled)`.
pub fn render_note(note: &Note) -> String {
    let title = note
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or(UNTITLED);
    let body = note.body.as_deref().unwrap_or("");
    format!("# {title}\n\n{body}")
}

/// Read one resource by URI.
///
/// Unknown URIs yield a `resource_not_found` error; backend failures an
/// internal error.
pub async fn read_resource(client: &JoplinClient, uri: &str) -> Result<ReadResourceResult, ErrorData> {
    debug!(uri, "Reading resource");

    let text = match ResourceUri::parse(uri) {
        Some(ResourceUri::Note(note_id)) => {
            let note = get_note(client, note_id, NOTE_FIELDS).await?;
            render_note(&note)
        }
        Some(ResourceUri::FolderTree) => {
            let tree = folder_tree(client).await?;
            serde_json::to_string_pretty(&tree).map_err(ToolError::from)?
        }
        None => {
            return Err(ErrorData::resource_not_found(
                format!("Unknown resource URI: {uri}"),
                None,
            ))
        }
    };

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri)],
    })
}
