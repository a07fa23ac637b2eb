use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::error::{InsightError, Result};
use crate::event::{handle_event, Event};
use crate::mcp::{process_request, RpcRequest};
use crate::tools::LogTools;

#[derive(Clone)]
pub struct AppState {
    pub tools: Arc<LogTools>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

async fn rpc_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RpcRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            return ErrorResponse {
                error: format!("invalid request body: {e}"),
            }
            .into_response()
        }
    };

    let resp = process_request(&state.tools, req).await;
    (StatusCode::OK, Json(resp)).into_response()
}

async fn invoke_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Event>, JsonRejection>,
) -> impl IntoResponse {
    let event = match payload {
        Ok(Json(event)) => event,
        Err(e) => {
            return ErrorResponse {
                error: format!("invalid request body: {e}"),
            }
            .into_response()
        }
    };

    // The event contract carries its own statusCode inside the body.
    let resp = handle_event(&state.tools, event).await;
    (StatusCode::OK, Json(resp)).into_response()
}

pub fn build_router(tools: Arc<LogTools>) -> Router {
    let state = AppState { tools };
    Router::new()
        .route("/rpc", post(rpc_handler))
        .route("/invoke", post(invoke_handler))
        .with_state(state)
}

pub async fn serve_http(tools: Arc<LogTools>, addr: &str) -> Result<()> {
    let router = build_router(tools);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| InsightError::Config(format!("bind {addr} failed: {e}")))?;
    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, router).await.map_err(|e| e.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::config::Config;

    fn test_router(base_url: &str) -> Router {
        let tools = Arc::new(LogTools::new(&Config {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
        }));
        build_router(tools)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn rpc_tools_list_returns_catalog() {
        let app = test_router("http://127.0.0.1:1");
        let (status, body) = post_json(
            app,
            "/rpc",
            json!({"id": 7, "method": "tools/list", "params": null}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 7);
        let tools = body["result"]["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "listRapid7Logsets"));
    }

    #[tokio::test]
    async fn rpc_invalid_body_returns_400() {
        let app = test_router("http://127.0.0.1:1");
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rpc")
                    .header("content-type", "application/json")
                    .body(Body::from("not-json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invoke_unknown_action_reports_400_in_body() {
        let app = test_router("http://127.0.0.1:1");
        let (status, body) =
            post_json(app, "/invoke", json!({"action": "nope", "input": {}})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], 400);
        assert!(body["body"].as_str().unwrap().contains("Unknown action: nope"));
    }

    #[tokio::test]
    async fn invoke_routes_action_to_operation() {
        let app = test_router("http://127.0.0.1:1");
        let (status, body) = post_json(
            app,
            "/invoke",
            json!({
                "action": "pollQuery",
                "input": {"queryId": "q-1"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], 200);
        // Closed port: the envelope inside carries a transport error text.
        assert!(body["body"].as_str().unwrap().contains("Error: "));
    }
}
