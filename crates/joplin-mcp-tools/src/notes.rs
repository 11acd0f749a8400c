//! Note tools
//!
//! CRUD on `/notes`, per-note tag and attachment listings, and the two
//! body-rewriting tools that link or unlink an attachment.

#![allow(missing_docs)]

use crate::error::{ToolError, ToolResult};
use crate::server::JoplinServer;
use crate::utils::{
    default_limit_20, default_limit_50, default_page, deleted, fields_query, json_result,
    list_page, require,
};
use joplin_mcp_client::{JoplinClient, Method};
use joplin_mcp_core::{
    attach_resource_link, detach_resource_link, from_record, JsonObject, Note, ValidationError,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{model::CallToolResult, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const NOTE_FIELDS: &str = "id,title,body,parent_id,created_time,updated_time";
pub(crate) const NOTE_LIST_FIELDS: &str = "id,title,parent_id,updated_time";
const NOTE_TAG_FIELDS: &str = "id,title";
const NOTE_RESOURCE_FIELDS: &str = "id,title,mime,filename,size";

/// Parameters for reading a note
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteGetParams {
    note_id: String,
    /// Comma-separated fields to return
    fields: Option<String>,
}

/// Parameters for listing notes
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteListParams {
    /// Only notes directly inside this folder
    parent_id: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    page: u32,
    /// Items per page (1-100)
    #[serde(default = "default_limit_20")]
    limit: u32,
    /// Comma-separated fields to return
    fields: Option<String>,
}

/// Parameters for creating a note
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteCreateParams {
    title: String,
    /// Markdown body
    body: String,
    /// Folder to create the note in
    parent_id: Option<String>,
}

/// Parameters for updating a note; omitted fields are left untouched
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteUpdateParams {
    note_id: String,
    title: Option<String>,
    /// New Markdown body
    body: Option<String>,
    /// Move the note to this folder
    parent_id: Option<String>,
}

/// Parameters identifying a note
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteIdParams {
    note_id: String,
}

/// Parameters for listings scoped to one note
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NotePageParams {
    note_id: String,
    /// 1-based page number
    #[serde(default = "default_page")]
    page: u32,
    /// Items per page (1-100)
    #[serde(default = "default_limit_50")]
    limit: u32,
    /// Comma-separated fields to return
    fields: Option<String>,
}

/// Parameters for linking an attachment from a note body
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteAttachParams {
    note_id: String,
    resource_id: String,
    /// Link text; defaults to the resource id
    text: Option<String>,
    /// Embed inline (`![..](..)`) instead of a plain link
    #[serde(default)]
    embed: bool,
}

/// Parameters for unlinking an attachment from a note body
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteDetachParams {
    note_id: String,
    resource_id: String,
}

impl JoplinServer {
    pub(crate) fn note_tools() -> ToolRouter<Self> {
        Self::notes_router()
    }
}

#[tool_router(router = notes_router)]
impl JoplinServer {
    #[tool(description = "Get a single note by id")]
    pub async fn notes_get(
        &self,
        params: Parameters<NoteGetParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let note_id = require("note_id", &params.note_id)?;
        let fields = params.fields.as_deref().unwrap_or(NOTE_FIELDS);

        let note = get_note(self.client(), note_id, fields).await?;
        json_result(note)
    }

    #[tool(description = "List notes, optionally only those inside one folder")]
    pub async fn notes_list(
        &self,
        params: Parameters<NoteListParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let mut query = Vec::new();
        if let Some(parent_id) = params.parent_id.filter(|id| !id.is_empty()) {
            query.push(("parent_id", parent_id));
        }

        let page = list_page(
            self.client(),
            "/notes",
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_LIST_FIELDS)),
            query,
        )
        .await?;
        json_result(page)
    }

    #[tool(description = "Create a new note")]
    pub async fn notes_create(
        &self,
        params: Parameters<NoteCreateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let mut payload = json!({ "title": params.title, "body": params.body });
        if let Some(parent_id) = params.parent_id.filter(|id| !id.is_empty()) {
            payload["parent_id"] = Value::String(parent_id);
        }

        let raw = self
            .client()
            .request_json(Method::POST, "/notes", &[], Some(&payload))
            .await
            .map_err(ToolError::from)?;
        json_result(into_note(raw)?)
    }

    #[tool(description = "Update title, body or folder of an existing note")]
    pub async fn notes_update(
        &self,
        params: Parameters<NoteUpdateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let note_id = require("note_id", &params.note_id)?;

        let mut payload = JsonObject::new();
        if let Some(title) = params.title {
            payload.insert("title".into(), Value::String(title));
        }
        if let Some(body) = params.body {
            payload.insert("body".into(), Value::String(body));
        }
        if let Some(parent_id) = params.parent_id {
            payload.insert("parent_id".into(), Value::String(parent_id));
        }
        if payload.is_empty() {
            return Err(ToolError::from(ValidationError::NothingToUpdate {
                fields: "title, body, parent_id",
            })
            .into());
        }

        let note = put_note(self.client(), note_id, Value::Object(payload)).await?;
        json_result(note)
    }

    #[tool(description = "Delete a note")]
    pub async fn notes_delete(
        &self,
        params: Parameters<NoteIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let note_id = require("note_id", &params.0.note_id)?;
        self.client()
            .request_json(Method::DELETE, &format!("/notes/{note_id}"), &[], None)
            .await
            .map_err(ToolError::from)?;
        json_result(deleted(note_id))
    }

    #[tool(description = "List the tags attached to a note")]
    pub async fn notes_list_tags(
        &self,
        params: Parameters<NotePageParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let note_id = require("note_id", &params.note_id)?;
        let page = list_page(
            self.client(),
            &format!("/notes/{note_id}/tags"),
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_TAG_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }

    #[tool(description = "List the attachments (resources) referenced by a note")]
    pub async fn notes_list_resources(
        &self,
        params: Parameters<NotePageParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let note_id = require("note_id", &params.note_id)?;
        let page = list_page(
            self.client(),
            &format!("/notes/{note_id}/resources"),
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_RESOURCE_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }

    #[tool(
        description = "Append a Markdown link (or inline embed) to an attachment at the end of a note body"
    )]
    pub async fn notes_attach_resource(
        &self,
        params: Parameters<NoteAttachParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let note_id = require("note_id", &params.note_id)?;
        let resource_id = require("resource_id", &params.resource_id)?;

        let body = get_body(self.client(), note_id).await?;
        let body = attach_resource_link(&body, resource_id, params.text.as_deref(), params.embed);
        debug!(note_id, resource_id, embed = params.embed, "Attaching resource link");

        let note = put_note(self.client(), note_id, json!({ "body": body })).await?;
        json_result(note)
    }

    #[tool(description = "Remove every line of a note body that links to an attachment")]
    pub async fn notes_detach_resource(
        &self,
        params: Parameters<NoteDetachParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let note_id = require("note_id", &params.note_id)?;
        let resource_id = require("resource_id", &params.resource_id)?;

        let body = get_body(self.client(), note_id).await?;
        let body = detach_resource_link(&body, resource_id);
        debug!(note_id, resource_id, "Detaching resource link");

        let raw = self
            .client()
            .request_json(
                Method::PUT,
                &format!("/notes/{note_id}"),
                &[],
                Some(&json!({ "body": body })),
            )
            .await
            .map_err(ToolError::from)?;
        json_result(raw)
    }
}

/// Fetch one note with the given field selection.
pub(crate) async fn get_note(client: &JoplinClient, note_id: &str, fields: &str) -> ToolResult<Note> {
    let raw = client
        .request_json(
            Method::GET,
            &format!("/notes/{note_id}"),
            &fields_query(Some(fields)),
            None,
        )
        .await?;
    into_note(raw)
}

async fn get_body(client: &JoplinClient, note_id: &str) -> ToolResult<String> {
    let note = get_note(client, note_id, "id,body").await?;
    Ok(note.body.unwrap_or_default())
}

async fn put_note(client: &JoplinClient, note_id: &str, payload: Value) -> ToolResult<Note> {
    let raw = client
        .request_json(Method::PUT, &format!("/notes/{note_id}"), &[], Some(&payload))
        .await?;
    into_note(raw)
}

fn into_note(raw: JsonObject) -> ToolResult<Note> {
    Ok(from_record(raw)?)
}
