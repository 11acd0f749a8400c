//! Tag tools

#![allow(missing_docs)]

use crate::error::ToolError;
use crate::notes::NOTE_LIST_FIELDS;
use crate::server::JoplinServer;
use crate::utils::{
    default_limit_20, default_limit_50, default_page, deleted, json_result, list_page, require,
};
use joplin_mcp_client::Method;
use joplin_mcp_core::{from_record, Tag};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{model::CallToolResult, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

const TAG_LIST_FIELDS: &str = "id,title";

/// Parameters for listing tags
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagListParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    page: u32,
    /// Items per page (1-100)
    #[serde(default = "default_limit_50")]
    limit: u32,
    /// Comma-separated fields to return
    fields: Option<String>,
}

/// Parameters for creating a tag
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagCreateParams {
    title: String,
}

/// Parameters for renaming a tag
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagUpdateParams {
    tag_id: String,
    title: String,
}

/// Parameters identifying a tag
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagIdParams {
    tag_id: String,
}

/// Parameters naming a tag and a note
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagNoteParams {
    tag_id: String,
    note_id: String,
}

/// Parameters for listing the notes carrying a tag
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagNotesParams {
    tag_id: String,
    /// 1-based page number
    #[serde(default = "default_page")]
    page: u32,
    /// Items per page (1-100)
    #[serde(default = "default_limit_20")]
    limit: u32,
    /// Comma-separated fields to return
    fields: Option<String>,
}

impl JoplinServer {
    pub(crate) fn tag_tools() -> ToolRouter<Self> {
        Self::tags_router()
    }
}

#[tool_router(router = tags_router)]
impl JoplinServer {
    #[tool(description = "List tags")]
    pub async fn tags_list(
        &self,
        params: Parameters<TagListParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let page = list_page(
            self.client(),
            "/tags",
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(TAG_LIST_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }

    #[tool(description = "Create a tag")]
    pub async fn tags_create(
        &self,
        params: Parameters<TagCreateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let raw = self
            .client()
            .request_json(
                Method::POST,
                "/tags",
                &[],
                Some(&json!({ "title": params.0.title })),
            )
            .await
            .map_err(ToolError::from)?;
        json_result(raw)
    }

    #[tool(description = "Rename a tag")]
    pub async fn tags_update(
        &self,
        params: Parameters<TagUpdateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let tag_id = require("tag_id", &params.tag_id)?;
        let raw = self
            .client()
            .request_json(
                Method::PUT,
                &format!("/tags/{tag_id}"),
                &[],
                Some(&json!({ "title": params.title })),
            )
            .await
            .map_err(ToolError::from)?;
        let tag: Tag = from_record(raw).map_err(ToolError::from)?;
        json_result(tag)
    }

    #[tool(description = "Delete a tag")]
    pub async fn tags_delete(
        &self,
        params: Parameters<TagIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let tag_id = require("tag_id", &params.0.tag_id)?;
        self.client()
            .request_json(Method::DELETE, &format!("/tags/{tag_id}"), &[], None)
            .await
            .map_err(ToolError::from)?;
        json_result(deleted(tag_id))
    }

    #[tool(description = "Attach a tag to a note")]
    pub async fn tags_add_note(
        &self,
        params: Parameters<TagNoteParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let tag_id = require("tag_id", &params.tag_id)?;
        let note_id = require("note_id", &params.note_id)?;

        self.client()
            .request_json(
                Method::POST,
                &format!("/tags/{tag_id}/notes"),
                &[],
                Some(&json!({ "id": note_id })),
            )
            .await
            .map_err(ToolError::from)?;
        json_result(json!({ "tag_id": tag_id, "note_id": note_id, "attached": true }))
    }

    #[tool(description = "Remove a tag from a note")]
    pub async fn tags_remove_note(
        &self,
        params: Parameters<TagNoteParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let tag_id = require("tag_id", &params.tag_id)?;
        let note_id = require("note_id", &params.note_id)?;

        self.client()
            .request_json(
                Method::DELETE,
                &format!("/tags/{tag_id}/notes/{note_id}"),
                &[],
                None,
            )
            .await
            .map_err(ToolError::from)?;
        json_result(json!({ "tag_id": tag_id, "note_id": note_id, "attached": false }))
    }

    #[tool(description = "List the notes carrying a tag")]
    pub async fn tags_list_notes(
        &self,
        params: Parameters<TagNotesParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let tag_id = require("tag_id", &params.tag_id)?;
        let page = list_page(
            self.client(),
            &format!("/tags/{tag_id}/notes"),
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_LIST_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }
}
