//! MCP (Model Context Protocol) handling module
//!
//! Newline-delimited JSON-RPC 2.0 over stdio. Requests are answered one at a
//! time, in arrival order.

use crate::client::XApi;
use crate::error::AppError;
use crate::tools::registry;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "x-mcp";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// State shared by every request: the authenticated adapter
#[derive(Clone)]
pub struct ServerContext {
    pub api: Arc<dyn XApi>,
    pub account: String,
    pub client_info: Option<ClientInfo>,
}

impl ServerContext {
    pub fn new(api: Arc<dyn XApi>, account: impl Into<String>) -> Self {
        Self {
            api,
            account: account.into(),
            client_info: None,
        }
    }

    pub fn get_client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i64,
    pub message: String,
}

/// MCP Tool call arguments
#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
}

impl ContentItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            r#type: "text".to_string(),
            text: content.into(),
        }
    }
}

/// Result envelope returned by every tool invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    pub kind: String,
    pub message: String,
}

impl ToolResult {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(ToolError {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
    }

    pub fn error_kind(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.kind.as_str())
    }

    /// Wrap as a `tools/call` result: the envelope JSON as a single text item
    pub fn to_call_result(&self) -> Value {
        let text = serde_json::to_string(self).unwrap_or_else(|e| {
            json!({
                "success": false,
                "error": { "kind": "Internal", "message": format!("Failed to encode result: {}", e) }
            })
            .to_string()
        });
        json!({
            "content": [ContentItem::text(text)],
            "isError": !self.success,
        })
    }
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.to_string(),
            }),
        }
    }
}

/// Parse MCP request from JSON string
pub fn parse_request(json: &str) -> Result<McpRequest, serde_json::Error> {
    serde_json::from_str(json)
}

/// Handle stdio MCP communication
pub async fn handle_stdio(context: ServerContext) -> Result<()> {
    let stdin = AsyncBufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(stdin, stdout, context).await
}

/// Serve requests from `reader` until it closes
pub async fn serve<R, W>(mut reader: R, mut writer: W, mut context: ServerContext) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Serving MCP on stdio as @{}", context.account);
    let mut buf = Vec::new();

    loop {
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                debug!("Received request: {}", line.trim_end());
                match parse_request(&line) {
                    Ok(request) => handle_request(request, &mut context).await,
                    Err(e) => {
                        error!("Failed to parse request: {}", e);
                        Some(McpResponse::error(None, PARSE_ERROR, &format!("Invalid JSON: {}", e)))
                    }
                }
            }
            Err(e) => {
                error!("Request is not valid UTF-8: {}", e);
                Some(McpResponse::error(None, PARSE_ERROR, &format!("Invalid UTF-8: {}", e)))
            }
        };

        let Some(response) = response else {
            continue;
        };
        let response_json = serde_json::to_string(&response)?;
        debug!("Sending response: {}", response_json);

        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}

/// Handle a single MCP request; notifications get no response
pub async fn handle_request(request: McpRequest, context: &mut ServerContext) -> Option<McpResponse> {
    if request.id.is_none() {
        debug!("Notification {}", request.method);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request, context),
        "tools/list" => McpResponse::success(request.id, json!({ "tools": build_tools_array() })),
        "tools/call" => handle_tool_call(request, context).await,
        "ping" => McpResponse::success(request.id, json!({})),
        _ => McpResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            &format!("Method '{}' not found", request.method),
        ),
    };
    Some(response)
}

async fn handle_tool_call(request: McpRequest, context: &ServerContext) -> McpResponse {
    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id,
                INVALID_PARAMS,
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    info!("tools/call {} from {}", args.name, context.get_client_name());
    let result = registry::invoke(context.api.as_ref(), &args.name, args.arguments).await;
    McpResponse::success(request.id, result.to_call_result())
}

fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    if let Some(params) = request.params {
        if let Ok(init) = serde_json::from_value::<InitializeParams>(params) {
            info!(
                "Client {} {} (protocol {})",
                init.client_info.as_ref().and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                init.client_info.as_ref().and_then(|c| c.version.as_deref()).unwrap_or(""),
                init.protocol_version.as_deref().unwrap_or("unspecified")
            );
            context.client_info = init.client_info;
        }
    }

    McpResponse::success(
        request.id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {
                "tools": { "listChanged": false }
            }
        }),
    )
}

/// Build the tools array returned from tools/list
pub fn build_tools_array() -> Value {
    Value::Array(registry::list_tools().iter().map(|t| t.to_json()).collect())
}
