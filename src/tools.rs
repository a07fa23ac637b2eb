use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::client::InsightClient;
use crate::config::Config;
use crate::error::{InsightError, Result};
use crate::model::{PollQueryParams, QueryLogsetByNameParams, QueryLogsetParams, ToolResponse};
use crate::request;

pub const TOOL_QUERY_LOGSET: &str = "queryRapid7Logset";
pub const TOOL_POLL_QUERY: &str = "pollRapid7Query";
pub const TOOL_LIST_LOGSETS: &str = "listRapid7Logsets";
pub const TOOL_QUERY_LOGSET_BY_NAME: &str = "queryRapid7LogsetByName";

/// Composition root: binds the four named operations to
/// validate -> build URL -> fetch -> package. Holds no per-invocation state,
/// so concurrent calls are safe.
#[derive(Clone)]
pub struct LogTools {
    client: InsightClient,
    base_url: String,
}

impl LogTools {
    pub fn new(config: &Config) -> Self {
        Self {
            client: InsightClient::new(config),
            base_url: config.base_url.clone(),
        }
    }

    /// Dispatch by tool name. Returns `None` for a name we never registered;
    /// everything else resolves to an envelope, never an error.
    pub async fn call(&self, name: &str, arguments: Value) -> Option<ToolResponse> {
        match name {
            TOOL_LIST_LOGSETS => Some(self.list_logsets().await),
            TOOL_QUERY_LOGSET => Some(self.query_logset(arguments).await),
            TOOL_QUERY_LOGSET_BY_NAME => Some(self.query_logset_by_name(arguments).await),
            TOOL_POLL_QUERY => Some(self.poll_query(arguments).await),
            _ => None,
        }
    }

    pub async fn list_logsets(&self) -> ToolResponse {
        let url = request::list_logsets_url(&self.base_url);
        package(self.client.get_json(&url).await)
    }

    pub async fn query_logset(&self, arguments: Value) -> ToolResponse {
        package(self.run_query_logset(arguments).await)
    }

    pub async fn query_logset_by_name(&self, arguments: Value) -> ToolResponse {
        package(self.run_query_logset_by_name(arguments).await)
    }

    pub async fn poll_query(&self, arguments: Value) -> ToolResponse {
        package(self.run_poll_query(arguments).await)
    }

    async fn run_query_logset(&self, arguments: Value) -> Result<Value> {
        let params: QueryLogsetParams = decode(arguments)?;
        let url = request::query_logset_url(&self.base_url, &params)?;
        self.client.get_json(&url).await
    }

    async fn run_query_logset_by_name(&self, arguments: Value) -> Result<Value> {
        let params: QueryLogsetByNameParams = decode(arguments)?;
        let url = request::query_logset_by_name_url(&self.base_url, &params)?;
        self.client.get_json(&url).await
    }

    async fn run_poll_query(&self, arguments: Value) -> Result<Value> {
        let params: PollQueryParams = decode(arguments)?;
        let url = request::poll_query_url(&self.base_url, &params)?;
        self.client.get_json(&url).await
    }
}

fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| InsightError::InvalidParams(e.to_string()))
}

/// Last line of defense: every outcome becomes a well-formed envelope.
fn package(outcome: Result<Value>) -> ToolResponse {
    match outcome {
        Ok(body) => ToolResponse::json(&body),
        Err(e) => ToolResponse::error(e),
    }
}

/// Tool catalog advertised over `tools/list`.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": TOOL_QUERY_LOGSET,
            "description": "Query Rapid7 logs with specified parameters for an entire log set",
            "inputSchema": {
                "type": "object",
                "required": ["from", "to", "logsetId"],
                "properties": {
                    "from": { "type": "string", "description": "Start datetime in ISO8601 format (YYYY-MM-DDTHH:MM:SSZ)" },
                    "to": { "type": "string", "description": "End datetime in ISO8601 format (YYYY-MM-DDTHH:MM:SSZ)" },
                    "perPage": { "type": "integer", "description": "Number of results per page (default: 100)", "default": 100 },
                    "logsetId": { "type": "string", "description": "Logset ID" },
                    "query": { "type": "string", "description": "Optional log query (can be omitted). Typical syntax: where(\"search term\", loose)" }
                }
            }
        }),
        json!({
            "name": TOOL_POLL_QUERY,
            "description": "Poll the status of a running Rapid7 log query using its query ID",
            "inputSchema": {
                "type": "object",
                "required": ["queryId"],
                "properties": {
                    "queryId": { "type": "string", "description": "The unique ID of the query to poll (as returned by the queryRapid7Logset tool)" },
                    "timeRange": { "type": "string", "description": "Optional time range (e.g., 'last 1 day', 'last 7 days'). If omitted, defaults to 'last 1 day'." }
                }
            }
        }),
        json!({
            "name": TOOL_LIST_LOGSETS,
            "description": "List all available Rapid7 logs sets",
            "inputSchema": {
                "type": "object",
                "properties": {}
            }
        }),
        json!({
            "name": TOOL_QUERY_LOGSET_BY_NAME,
            "description": "Query Rapid7 logs with specified parameters for a logset identified by name",
            "inputSchema": {
                "type": "object",
                "required": ["logsetName", "from", "to"],
                "properties": {
                    "logsetName": { "type": "string", "description": "Name of the logset to query" },
                    "from": { "type": "string", "description": "Start datetime in ISO8601 format (YYYY-MM-DDTHH:MM:SSZ)" },
                    "to": { "type": "string", "description": "End datetime in ISO8601 format (YYYY-MM-DDTHH:MM:SSZ)" },
                    "perPage": { "type": "integer", "description": "Number of results per page (default: 100)", "default": 100 },
                    "query": { "type": "string", "description": "Optional log query (can be omitted). Typical syntax: where(\"search term\", loose)" }
                }
            }
        }),
    ]
}
