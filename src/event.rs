use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tools::LogTools;

/// Inbound `{action, input}` event, e.g. a serverless invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub action: String,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Maps an action name onto one of the four operations. Operations themselves
/// never fail, so 500 only covers envelope serialization going wrong.
pub async fn handle_event(tools: &LogTools, event: Event) -> EventResponse {
    let envelope = match event.action.as_str() {
        "listLogsets" => tools.list_logsets().await,
        "queryLogset" => tools.query_logset(event.input).await,
        "pollQuery" => tools.poll_query(event.input).await,
        "queryLogsetByName" => tools.query_logset_by_name(event.input).await,
        other => {
            return EventResponse {
                status_code: 400,
                body: json!({ "error": format!("Unknown action: {other}") }).to_string(),
            }
        }
    };

    match serde_json::to_string(&envelope) {
        Ok(body) => EventResponse {
            status_code: 200,
            body,
        },
        Err(e) => EventResponse {
            status_code: 500,
            body: json!({ "error": e.to_string() }).to_string(),
        },
    }
}
