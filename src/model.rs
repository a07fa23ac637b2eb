use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_TIME_RANGE: &str = "last 1 day";

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_time_range() -> String {
    DEFAULT_TIME_RANGE.to_string()
}

/// Parameters for a time-bounded search over a logset addressed by ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLogsetParams {
    pub from: String,
    pub to: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    pub logset_id: String,
    #[serde(default)]
    pub query: Option<String>,
}

/// Same search, but the logset is addressed by display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLogsetByNameParams {
    pub logset_name: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub query: Option<String>,
}

/// Parameters for polling an asynchronous query by its ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollQueryParams {
    pub query_id: String,
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// The uniform envelope every tool invocation returns: one text content item,
/// carrying either pretty-printed JSON or an `Error: ...` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
}

impl ToolResponse {
    pub fn json(body: &Value) -> Self {
        let text = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text,
                mime_type: Some("application/json".to_string()),
            }],
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text: format!("Error: {message}"),
                mime_type: None,
            }],
        }
    }

    /// The single content item's text. Tool responses always carry exactly one.
    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}
