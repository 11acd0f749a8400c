//! Folder (notebook) tools

#![allow(missing_docs)]

use crate::error::{ToolError, ToolResult};
use crate::notes::NOTE_LIST_FIELDS;
use crate::server::JoplinServer;
use crate::utils::{
    default_limit_20, default_limit_50, default_page, deleted, fields_query, json_result,
    list_page, require,
};
use joplin_mcp_client::{JoplinClient, Method};
use joplin_mcp_core::{
    build_folder_tree, from_record, Folder, FolderNode, JsonObject, PageRequest, PagedResult,
    ValidationError, MAX_PAGE_LIMIT,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{model::CallToolResult, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

const FOLDER_FIELDS: &str = "id,title,parent_id,created_time,updated_time";
const FOLDER_LIST_FIELDS: &str = "id,title,parent_id";
const TREE_FIELDS: &str = "id,title,parent_id";

/// Parameters identifying a folder
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FolderIdParams {
    folder_id: String,
}

/// Parameters for listing folders
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FolderListParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    page: u32,
    /// Items per page (1-100)
    #[serde(default = "default_limit_50")]
    limit: u32,
    /// Comma-separated fields to return
    fields: Option<String>,
}

/// Parameters for creating a folder
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FolderCreateParams {
    title: String,
    /// Parent folder; omit for a top-level folder
    parent_id: Option<String>,
}

/// Parameters for renaming or moving a folder
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FolderUpdateParams {
    folder_id: String,
    title: Option<String>,
    /// New parent folder; an empty string moves it to the top level
    parent_id: Option<String>,
}

/// Parameters for listing the notes of one folder
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FolderNotesParams {
    folder_id: String,
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
    pub(crate) fn folder_tools() -> ToolRouter<Self> {
        Self::folders_router()
    }
}

#[tool_router(router = folders_router)]
impl JoplinServer {
    #[tool(description = "Get a single folder (notebook) by id")]
    pub async fn folders_get(
        &self,
        params: Parameters<FolderIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let folder_id = require("folder_id", &params.0.folder_id)?;
        let raw = self
            .client()
            .request_json(
                Method::GET,
                &format!("/folders/{folder_id}"),
                &fields_query(Some(FOLDER_FIELDS)),
                None,
            )
            .await
            .map_err(ToolError::from)?;
        json_result(into_folder(raw)?)
    }

    #[tool(description = "List folders (notebooks)")]
    pub async fn folders_list(
        &self,
        params: Parameters<FolderListParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let page = list_page(
            self.client(),
            "/folders",
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(FOLDER_LIST_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }

    #[tool(description = "Create a folder (notebook), optionally inside another folder")]
    pub async fn folders_create(
        &self,
        params: Parameters<FolderCreateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let mut payload = json!({ "title": params.title });
        if let Some(parent_id) = params.parent_id.filter(|id| !id.is_empty()) {
            payload["parent_id"] = Value::String(parent_id);
        }

        let raw = self
            .client()
            .request_json(Method::POST, "/folders", &[], Some(&payload))
            .await
            .map_err(ToolError::from)?;
        json_result(into_folder(raw)?)
    }

    #[tool(description = "Rename a folder or move it under another parent")]
    pub async fn folders_update(
        &self,
        params: Parameters<FolderUpdateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let folder_id = require("folder_id", &params.folder_id)?;

        let mut payload = JsonObject::new();
        if let Some(title) = params.title {
            payload.insert("title".into(), Value::String(title));
        }
        if let Some(parent_id) = params.parent_id {
            payload.insert("parent_id".into(), Value::String(parent_id));
        }
        if payload.is_empty() {
            return Err(ToolError::from(ValidationError::NothingToUpdate {
                fields: "title, parent_id",
            })
            .into());
        }

        let raw = self
            .client()
            .request_json(
                Method::PUT,
                &format!("/folders/{folder_id}"),
                &[],
                Some(&Value::Object(payload)),
            )
            .await
            .map_err(ToolError::from)?;
        json_result(into_folder(raw)?)
    }

    #[tool(description = "Delete a folder")]
    pub async fn folders_delete(
        &self,
        params: Parameters<FolderIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let folder_id = require("folder_id", &params.0.folder_id)?;
        self.client()
            .request_json(Method::DELETE, &format!("/folders/{folder_id}"), &[], None)
            .await
            .map_err(ToolError::from)?;
        json_result(deleted(folder_id))
    }

    #[tool(description = "List the notes directly inside a folder")]
    pub async fn folders_list_notes(
        &self,
        params: Parameters<FolderNotesParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let folder_id = require("folder_id", &params.folder_id)?;
        let page = list_page(
            self.client(),
            &format!("/folders/{folder_id}/notes"),
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_LIST_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }

    #[tool(description = "Return the folder hierarchy as a nested tree, siblings sorted by title")]
    pub async fn folders_tree(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let tree = folder_tree(self.client()).await?;
        json_result(tree)
    }
}

/// Fetch the first page of folders and nest them.
///
/// Only `MAX_PAGE_LIMIT` folders are read; anything past that is dropped with
/// a warning.
pub(crate) async fn folder_tree(client: &JoplinClient) -> ToolResult<Vec<FolderNode>> {
    let request = PageRequest::new(1, MAX_PAGE_LIMIT)?;
    let raw = client
        .get_paged(
            "/folders",
            request.page(),
            request.limit(),
            &fields_query(Some(TREE_FIELDS)),
        )
        .await?;
    let listing = PagedResult::from_response(raw, request);
    if listing.has_more {
        warn!(
            limit = listing.limit,
            "Folder listing truncated; tree only covers the first page"
        );
    }

    let folders = listing
        .items
        .into_iter()
        .map(from_record::<Folder>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(build_folder_tree(&folders))
}

fn into_folder(raw: JsonObject) -> ToolResult<Folder> {
    Ok(from_record(raw)?)
}
