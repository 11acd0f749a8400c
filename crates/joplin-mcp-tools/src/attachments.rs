//! Attachment tools
//!
//! Joplin calls attachments "resources". Content travels through MCP as
//! standard base64 in both directions.

#![allow(missing_docs)]

use crate::error::{ToolError, ToolResult};
use crate::notes::NOTE_LIST_FIELDS;
use crate::server::JoplinServer;
use crate::utils::{
    default_limit_20, default_limit_50, default_page, deleted, fields_query, json_result,
    list_page, require,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use joplin_mcp_client::{JoplinClient, Method};
use joplin_mcp_core::{from_record, JsonObject, Resource, ResourceBlob, ValidationError};
use mime_guess::mime::Mime;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{model::CallToolResult, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

const RESOURCE_FIELDS: &str = "id,title,mime,filename,file_extension,size,created_time,updated_time";
const RESOURCE_LIST_FIELDS: &str = "id,title,mime,filename,size,updated_time";

/// Parameters for listing attachments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResourceListParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    page: u32,
    /// Items per page (1-100)
    #[serde(default = "default_limit_50")]
    limit: u32,
    /// Comma-separated fields to return
    fields: Option<String>,
}

/// Parameters identifying an attachment
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResourceIdParams {
    resource_id: String,
}

/// Parameters for uploading an attachment
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResourceCreateParams {
    /// File name, also used to guess the MIME type
    filename: String,
    /// File content, standard base64
    data_base64: String,
    /// MIME type; guessed from the file name when omitted
    mime: Option<String>,
    /// Display title; defaults to the file name
    title: Option<String>,
}

/// Parameters for renaming an attachment
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResourceUpdateParams {
    resource_id: String,
    title: String,
}

/// Parameters for listing the notes that reference an attachment
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResourceNotesParams {
    resource_id: String,
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
    pub(crate) fn attachment_tools() -> ToolRouter<Self> {
        Self::attachments_router()
    }
}

#[tool_router(router = attachments_router)]
impl JoplinServer {
    #[tool(description = "List attachments (resources)")]
    pub async fn resources_list(
        &self,
        params: Parameters<ResourceListParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let page = list_page(
            self.client(),
            "/resources",
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(RESOURCE_LIST_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }

    #[tool(description = "Get attachment metadata by id")]
    pub async fn resources_get(
        &self,
        params: Parameters<ResourceIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let resource_id = require("resource_id", &params.0.resource_id)?;
        let resource = get_resource(self.client(), resource_id).await?;
        json_result(resource)
    }

    #[tool(description = "Download attachment content as base64 together with its MIME type")]
    pub async fn resources_get_content(
        &self,
        params: Parameters<ResourceIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let resource_id = require("resource_id", &params.0.resource_id)?;
        let blob = get_content(self.client(), resource_id).await?;
        json_result(blob)
    }

    #[tool(description = "Upload a new attachment from base64 content")]
    pub async fn resources_create(
        &self,
        params: Parameters<ResourceCreateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let filename = require("filename", &params.filename)?;
        let data = decode_payload(&params.data_base64)?;
        let mime = match params.mime.filter(|mime| !mime.is_empty()) {
            Some(mime) => validate_mime(&mime)?,
            None => guess_mime(filename),
        };

        let raw = self
            .client()
            .create_resource(filename, data, &mime, params.title.as_deref())
            .await
            .map_err(ToolError::from)?;
        json_result(into_resource(raw)?)
    }

    #[tool(description = "Rename an attachment")]
    pub async fn resources_update(
        &self,
        params: Parameters<ResourceUpdateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let resource_id = require("resource_id", &params.resource_id)?;
        let raw = self
            .client()
            .update_resource_metadata(resource_id, &params.title)
            .await
            .map_err(ToolError::from)?;
        json_result(into_resource(raw)?)
    }

    #[tool(description = "Delete an attachment")]
    pub async fn resources_delete(
        &self,
        params: Parameters<ResourceIdParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let resource_id = require("resource_id", &params.0.resource_id)?;
        self.client()
            .request_json(Method::DELETE, &format!("/resources/{resource_id}"), &[], None)
            .await
            .map_err(ToolError::from)?;
        json_result(deleted(resource_id))
    }

    #[tool(description = "List the notes that reference an attachment")]
    pub async fn resources_list_notes(
        &self,
        params: Parameters<ResourceNotesParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let resource_id = require("resource_id", &params.resource_id)?;
        let page = list_page(
            self.client(),
            &format!("/resources/{resource_id}/notes"),
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_LIST_FIELDS)),
            Vec::new(),
        )
        .await?;
        json_result(page)
    }
}

async fn get_resource(client: &JoplinClient, resource_id: &str) -> ToolResult<Resource> {
    let raw = client
        .request_json(
            Method::GET,
            &format!("/resources/{resource_id}"),
            &fields_query(Some(RESOURCE_FIELDS)),
            None,
        )
        .await?;
    into_resource(raw)
}

async fn get_content(client: &JoplinClient, resource_id: &str) -> ToolResult<ResourceBlob> {
    let resource = get_resource(client, resource_id).await?;
    let body = client
        .request_bytes(Method::GET, &format!("/resources/{resource_id}/file"), &[])
        .await?;
    debug!(resource_id, size = body.data.len(), "Fetched resource content");

    let mime = resource
        .mime
        .filter(|mime| !mime.is_empty())
        .or_else(|| body.content_type().map(str::to_string));

    Ok(ResourceBlob {
        id: resource.id,
        mime,
        filename: resource.filename,
        size: body.data.len() as u64,
        data_base64: STANDARD.encode(&body.data),
    })
}

/// Decode standard base64, tolerating line breaks and surrounding whitespace.
fn decode_payload(data_base64: &str) -> ToolResult<Vec<u8>> {
    let compact: String = data_base64
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| ValidationError::InvalidBase64(e.to_string()).into())
}

/// Reject a caller-supplied MIME type that does not parse.
fn validate_mime(mime: &str) -> ToolResult<String> {
    mime.trim()
        .parse::<Mime>()
        .map(|parsed| parsed.to_string())
        .map_err(|_| ValidationError::InvalidMime(mime.to_string()).into())
}

fn guess_mime(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn into_resource(raw: JsonObject) -> ToolResult<Resource> {
    Ok(from_record(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{result_json, test_server};
    use rmcp::model::ErrorCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn mime_is_guessed_from_extension() {
        assert_eq!(guess_mime("photo.PNG"), "image/png");
        assert_eq!(guess_mime("report.pdf"), "application/pdf");
        assert_eq!(guess_mime("no-extension"), "application/octet-stream");
    }

    #[test]
    fn payload_decoding_tolerates_wrapping() {
        assert_eq!(decode_payload("aGVs\nbG8=\n").unwrap(), b"hello");
        assert!(matches!(
            decode_payload("not base64!"),
            Err(ToolError::Validation(ValidationError::InvalidBase64(_)))
        ));
    }

    #[tokio::test]
    async fn resources_get_uses_metadata_fields() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources/r1"))
            .and(query_param("fields", RESOURCE_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r1",
                "title": "scan",
                "mime": "application/pdf",
                "filename": "scan.pdf",
                "file_extension": "pdf",
                "size": 1024,
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let result = server
            .resources_get(Parameters(ResourceIdParams {
                resource_id: "r1".to_string(),
            }))
            .await
            .unwrap();

        let resource = result_json(&result);
        assert_eq!(resource["file_extension"], "pdf");
        assert_eq!(resource["size"], 1024);
    }

    #[tokio::test]
    async fn resources_get_content_encodes_bytes() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r1",
                "mime": "",
                "filename": "hello.txt",
            })))
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/resources/r1/file"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_bytes(b"hello".to_vec()),
            )
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let result = server
            .resources_get_content(Parameters(ResourceIdParams {
                resource_id: "r1".to_string(),
            }))
            .await
            .unwrap();

        let blob: ResourceBlob = serde_json::from_value(result_json(&result)).unwrap();
        assert_eq!(blob.id, "r1");
        assert_eq!(blob.mime.as_deref(), Some("text/plain"));
        assert_eq!(blob.filename.as_deref(), Some("hello.txt"));
        assert_eq!(blob.size, 5);
        assert_eq!(blob.data_base64, "aGVsbG8=");
    }

    #[tokio::test]
    async fn resources_create_guesses_mime_and_uploads() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resources"))
            .and(body_string_contains("Content-Type: image/png"))
            .and(body_string_contains(r#"{"title":"Diagram"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r2",
                "title": "Diagram",
                "mime": "image/png",
                "filename": "diagram.png",
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let result = server
            .resources_create(Parameters(ResourceCreateParams {
                filename: "diagram.png".to_string(),
                data_base64: STANDARD.encode(b"png-ish"),
                mime: None,
                title: Some("Diagram".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(result_json(&result)["id"], "r2");
    }

    #[tokio::test]
    async fn resources_create_rejects_bad_base64_without_uploading() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let err = server
            .resources_create(Parameters(ResourceCreateParams {
                filename: "a.bin".to_string(),
                data_base64: "%%%".to_string(),
                mime: None,
                title: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn supplied_mime_must_parse() {
        assert_eq!(validate_mime(" text/plain ").unwrap(), "text/plain");
        assert_eq!(
            validate_mime("text/plain; charset=utf-8").unwrap(),
            "text/plain; charset=utf-8"
        );
        assert!(matches!(
            validate_mime("not a mime"),
            Err(ToolError::Validation(ValidationError::InvalidMime(_)))
        ));
    }

    #[tokio::test]
    async fn resources_create_rejects_bad_mime_without_uploading() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let err = server
            .resources_create(Parameters(ResourceCreateParams {
                filename: "a.txt".to_string(),
                data_base64: STANDARD.encode(b"hello"),
                mime: Some("not a mime".to_string()),
                title: None,
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("not a mime"));
    }

    #[tokio::test]
    async fn resources_update_and_delete() {
        let mock = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/resources/r1"))
            .and(body_json(json!({"title": "Renamed"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "r1", "title": "Renamed"})),
            )
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/resources/r1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server(&mock);

        let result = server
            .resources_update(Parameters(ResourceUpdateParams {
                resource_id: "r1".to_string(),
                title: "Renamed".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result_json(&result)["title"], "Renamed");

        let result = server
            .resources_delete(Parameters(ResourceIdParams {
                resource_id: "r1".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result_json(&result), json!({"deleted": true, "id": "r1"}));
    }

    #[tokio::test]
    async fn listings_use_defaults() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources"))
            .and(query_param("limit", "50"))
            .and(query_param("fields", RESOURCE_LIST_FIELDS))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": [], "has_more": false})),
            )
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/resources/r1/notes"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "n1"}],
                "has_more": false,
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server(&mock);

        let params: ResourceListParams = serde_json::from_value(json!({})).unwrap();
        server.resources_list(Parameters(params)).await.unwrap();

        let params: ResourceNotesParams =
            serde_json::from_value(json!({"resource_id": "r1"})).unwrap();
        let page = result_json(&server.resources_list_notes(Parameters(params)).await.unwrap());
        assert_eq!(page["items"][0]["id"], "n1");
    }
}
