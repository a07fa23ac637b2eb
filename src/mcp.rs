use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::tools::{self, LogTools};

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    code: i32,
    message: String,
}

pub async fn run_stdio(tools: Arc<LogTools>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let req: RpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                write_response(
                    &mut stdout,
                    RpcResponse {
                        jsonrpc: "2.0",
                        id: Value::Null,
                        result: None,
                        error: Some(RpcError {
                            code: -32700,
                            message: format!("parse error: {e}"),
                        }),
                    },
                )
                .await?;
                continue;
            }
        };

        // Notifications carry no id and expect no response.
        if req.id.is_null() && req.method.starts_with("notifications/") {
            continue;
        }

        let resp = process_request(&tools, req).await;
        write_response(&mut stdout, resp).await?;
    }

    Ok(())
}

/// Shared by the stdio loop and the HTTP transport.
pub async fn process_request(tools: &LogTools, req: RpcRequest) -> RpcResponse {
    match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "notifications/initialized" => RpcResponse {
            jsonrpc: "2.0",
            id: req.id,
            result: Some(Value::Bool(true)),
            error: None,
        },
        "tools/list" | "list_tools" => handle_list_tools(&req),
        "tools/call" | "call_tool" => handle_call_tool(tools, &req).await,
        _ => rpc_error(&req, -32601, format!("method not found: {}", req.method)),
    }
}

fn handle_initialize(req: &RpcRequest) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id: req.id.clone(),
        result: Some(serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "rapid7-logs-mcp",
                "version": "0.1.0"
            }
        })),
        error: None,
    }
}

fn handle_list_tools(req: &RpcRequest) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id: req.id.clone(),
        result: Some(serde_json::json!({ "tools": tools::tool_definitions() })),
        error: None,
    }
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn handle_call_tool(tools: &LogTools, req: &RpcRequest) -> RpcResponse {
    let params: CallToolParams = match serde_json::from_value(req.params.clone()) {
        Ok(p) => p,
        Err(e) => return rpc_error(req, -32602, format!("invalid params: {e}")),
    };

    match tools.call(&params.name, params.arguments).await {
        Some(resp) => RpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::to_value(resp).unwrap_or(Value::Null)),
            error: None,
        },
        None => rpc_error(req, -32602, format!("unknown tool: {}", params.name)),
    }
}

async fn write_response(stdout: &mut tokio::io::Stdout, resp: RpcResponse) -> Result<()> {
    let line = serde_json::to_string(&resp).unwrap_or_else(|_| "{}".to_string());
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

fn rpc_error(req: &RpcRequest, code: i32, message: String) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id: req.id.clone(),
        result: None,
        error: Some(RpcError { code, message }),
    }
}
