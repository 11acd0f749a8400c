//! Helpers shared by the tool modules.

use crate::error::ToolResult;
use joplin_mcp_client::JoplinClient;
use joplin_mcp_core::{parse_fields, PageRequest, PagedResult, ValidationError};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::json;

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_limit_20() -> u32 {
    20
}

pub(crate) fn default_limit_50() -> u32 {
    50
}

/// Wrap a serializable value as a successful JSON tool result.
pub(crate) fn json_result<T: Serialize>(value: T) -> Result<CallToolResult, rmcp::ErrorData> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

/// Reject empty identifiers before they turn into malformed paths.
pub(crate) fn require<'a>(name: &'static str, value: &'a str) -> ToolResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyArgument(name).into());
    }
    Ok(value)
}

/// Query parameters carrying a normalized `fields` selection, if any.
pub(crate) fn fields_query(fields: Option<&str>) -> Vec<(&'static str, String)> {
    parse_fields(fields)
        .map(|fields| vec![("fields", fields)])
        .unwrap_or_default()
}

/// Validate paging, fetch one page of `path` and shape the result.
pub(crate) async fn list_page(
    client: &JoplinClient,
    path: &str,
    page: u32,
    limit: u32,
    fields: Option<&str>,
    mut params: Vec<(&'static str, String)>,
) -> ToolResult<PagedResult> {
    let request = PageRequest::new(page, limit)?;
    params.extend(fields_query(fields));

    let raw = client
        .get_paged(path, request.page(), request.limit(), &params)
        .await?;
    Ok(PagedResult::from_response(raw, request))
}

/// `{"deleted": true, "id": ...}`
pub(crate) fn deleted(id: &str) -> serde_json::Value {
    json!({ "deleted": true, "id": id })
}
