//! HTTP client for the Joplin Data API

use crate::{
    config::ClientConfig,
    error::{BackendError, ClientError, Result},
};
use joplin_mcp_core::JsonObject;
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Method, RequestBuilder, Response,
};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

/// Query parameters for a single request
pub type Query<'a> = [(&'a str, String)];

/// Raw response body plus headers, for binary endpoints
#[derive(Debug, Clone)]
pub struct BinaryBody {
    /// Response bytes
    pub data: Vec<u8>,
    /// Response headers
    pub headers: HeaderMap,
}

impl BinaryBody {
    /// Value of the `content-type` header, if present and valid UTF-8
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// Client for the Joplin Data API (Web Clipper service)
///
/// Owns one connection pool. Every request carries the API token as the
/// `token` query parameter unless the caller already supplied one.
pub struct JoplinClient {
    client: Client,
    base_url: String,
    token: String,
}

impl JoplinClient {
    /// Create a client with the given token and default settings
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::builder().token(token).build())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            token: config.token,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ===== JSON endpoints =====

    /// Issue one request and decode the JSON object it returns
    ///
    /// `path` gets a leading `/` if it lacks one. An empty success body (as
    /// returned by deletes) decodes as an empty object.
    ///
    /// # Example
    /// ```no_run
    /// # use joplin_mcp_client::JoplinClient;
    /// # use joplin_mcp_client::Method;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = JoplinClient::new("api-token")?;
    /// let note = client
    ///     .request_json(Method::GET, "/notes/abc", &[("fields", "id,title".to_string())], None)
    ///     .await?;
    /// println!("{:?}", note.get("title"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        params: &Query<'_>,
        json_body: Option<&Value>,
    ) -> Result<JsonObject> {
        let url = self.build_url(path, params)?;
        let shown = redact_token(&url);
        debug!(%method, url = %shown, "Joplin request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = json_body {
            request = request.json(body);
        }

        let response = send(request).await?;
        decode_object(&method, &shown, response).await
    }

    /// GET a paginated listing, merging `page` and `limit` into `params`
    ///
    /// Bounds are not checked here; callers validate first.
    pub async fn get_paged(
        &self,
        path: &str,
        page: u32,
        limit: u32,
        params: &Query<'_>,
    ) -> Result<JsonObject> {
        let mut query: Vec<(&str, String)> = params
            .iter()
            .filter(|(key, _)| *key != "page" && *key != "limit")
            .cloned()
            .collect();
        query.push(("page", page.to_string()));
        query.push(("limit", limit.to_string()));

        self.request_json(Method::GET, path, &query, None).await
    }

    // ===== Binary endpoints =====

    /// Issue one request and return the raw body with its headers
    pub async fn request_bytes(
        &self,
        method: Method,
        path: &str,
        params: &Query<'_>,
    ) -> Result<BinaryBody> {
        let url = self.build_url(path, params)?;
        let shown = redact_token(&url);
        debug!(%method, url = %shown, "Joplin binary request");

        let response = send(self.client.request(method.clone(), url)).await?;
        let status = response.status();
        let headers = response.headers().clone();

        if status.as_u16() >= 400 {
            let text = response.text().await.map_err(|e| e.without_url())?;
            return Err(backend_error(&method, &shown, status.as_u16(), text.trim()).into());
        }

        let data = response.bytes().await.map_err(|e| e.without_url())?;
        Ok(BinaryBody {
            data: data.to_vec(),
            headers,
        })
    }

    /// Upload a new attachment
    ///
    /// Sends a multipart POST to `/resources` with the file in part `data`
    /// and `{"title": ...}` in part `props`. The title defaults to the
    /// filename.
    pub async fn create_resource(
        &self,
        filename: &str,
        data: Vec<u8>,
        mime: &str,
        title: Option<&str>,
    ) -> Result<JsonObject> {
        let url = self.build_url("/resources", &[])?;
        let shown = redact_token(&url);
        debug!(url = %shown, filename, mime, size = data.len(), "Joplin resource upload");

        let file = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(mime)?;
        let props = serde_json::to_string(&json!({ "title": title.unwrap_or(filename) }))?;
        let form = Form::new().part("data", file).text("props", props);

        let response = send(self.client.post(url).multipart(form)).await?;
        decode_object(&Method::POST, &shown, response).await
    }

    /// Change an attachment's title
    pub async fn update_resource_metadata(&self, resource_id: &str, title: &str) -> Result<JsonObject> {
        let body = json!({ "title": title });
        self.request_json(
            Method::PUT,
            &format!("/resources/{resource_id}"),
            &[],
            Some(&body),
        )
        .await
    }

    /// Release the connection pool
    pub fn close(self) {
        info!(base_url = %self.base_url, "Closing Joplin client");
        drop(self.client);
    }

    // ===== Helper Methods =====

    fn build_url(&self, path: &str, params: &Query<'_>) -> Result<Url> {
        let mut url = if path.starts_with('/') {
            Url::parse(&format!("{}{}", self.base_url, path))?
        } else {
            Url::parse(&format!("{}/{}", self.base_url, path))?
        };

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            if !params.iter().any(|(key, _)| *key == "token") {
                pairs.append_pair("token", &self.token);
            }
        }

        Ok(url)
    }
}

impl fmt::Debug for JoplinClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoplinClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| {
        let e = e.without_url();
        warn!(error = %e, "Joplin request failed");
        ClientError::Network(e)
    })
}

async fn decode_object(method: &Method, shown: &str, response: Response) -> Result<JsonObject> {
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| e.without_url())?;

    if status >= 400 {
        return Err(backend_error(method, shown, status, text.trim()).into());
    }

    if text.trim().is_empty() {
        return Ok(JsonObject::new());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(backend_error(
            method,
            shown,
            status,
            &format!("Unexpected JSON type: {}", json_kind(&other)),
        )
        .into()),
        Err(_) => Err(backend_error(method, shown, status, "Unexpected JSON type: invalid JSON").into()),
    }
}

fn backend_error(method: &Method, url: &str, status_code: u16, text: &str) -> BackendError {
    let error = BackendError {
        status_code,
        method: method.as_str().to_uppercase(),
        url: url.to_string(),
        response_text: text.to_string(),
    };
    warn!(status = status_code, %method, url, "Joplin API error");
    error
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a URL with the `token` query value masked
fn redact_token(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "token") {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "token" {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
