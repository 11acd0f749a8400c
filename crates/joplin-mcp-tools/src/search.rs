//! Full-text search tool

#![allow(missing_docs)]

use crate::notes::NOTE_LIST_FIELDS;
use crate::server::JoplinServer;
use crate::utils::{default_limit_20, default_page, json_result, list_page};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{model::CallToolResult, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;

fn default_search_type() -> String {
    "note".to_string()
}

/// Parameters for searching
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Joplin search query, e.g. `tag:work title:plan*`
    query: String,
    /// Item type to search: note, folder, tag or resource
    #[serde(default = "default_search_type")]
    search_type: String,
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
    pub(crate) fn search_tools() -> ToolRouter<Self> {
        Self::search_router()
    }
}

#[tool_router(router = search_router)]
impl JoplinServer {
    #[tool(description = "Search Joplin items (default type: note)")]
    pub async fn search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let query = vec![("query", params.query), ("type", params.search_type)];
        let page = list_page(
            self.client(),
            "/search",
            params.page,
            params.limit,
            Some(params.fields.as_deref().unwrap_or(NOTE_LIST_FIELDS)),
            query,
        )
        .await?;
        json_result(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{result_json, test_server};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn search_defaults_to_notes() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "groceries"))
            .and(query_param("type", "note"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "20"))
            .and(query_param("fields", "id,title,parent_id,updated_time"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "n1", "title": "Groceries"}],
                "has_more": false,
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let params: SearchParams = serde_json::from_value(json!({"query": "groceries"})).unwrap();
        let result = server.search(Parameters(params)).await.unwrap();

        let page = result_json(&result);
        assert_eq!(page["items"][0]["title"], "Groceries");
        assert_eq!(page["has_more"], false);
    }

    #[tokio::test]
    async fn search_other_types() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("type", "folder"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "has_more": true,
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let server = test_server(&mock);
        let result = server
            .search(Parameters(SearchParams {
                query: "proj*".to_string(),
                search_type: "folder".to_string(),
                page: 3,
                limit: 10,
                fields: Some("id,title".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(result_json(&result)["next_page"], 4);
    }
}
