//! MCP request handler
//!
//! Stateless dispatch of JSON-RPC methods; shared by the stdio and HTTP
//! transports.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::mcp::error::McpError;
use crate::mcp::protocol::{
    ContentBlock, Implementation, InitializeParams, InitializeResult, JsonRpcId, JsonRpcRequest,
    JsonRpcResponse, ListChangedCapability, PromptGetParams, PromptsListResult,
    ResourceCapabilities, ResourceReadParams, ResourceReadResult, ResourcesListResult,
    ServerCapabilities, ToolCallParams, ToolCallResult, ToolDefinition, ToolsListResult,
    JSONRPC_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::mcp::{prompts, resources};
use crate::tools::ToolRegistry;

pub const SERVER_NAME: &str = "FinPilot";

pub const SERVER_INSTRUCTIONS: &str = "FinPilot is your AI financial co-pilot for:
- Credit report analysis and optimization
- Portfolio analysis and recommendations
- Loan optimization (switch to LAMF, refinancing)
- Comprehensive financial planning

All analysis is powered by FinPilot's proprietary algorithms.";

/// Pick the protocol version to answer with.
///
/// Echo the client's version when we support it, otherwise offer our newest.
pub fn negotiate_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
        .copied()
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

#[derive(Clone)]
pub struct McpHandler {
    registry: Arc<ToolRegistry>,
    has_credentials: bool,
}

impl McpHandler {
    pub fn new(registry: Arc<ToolRegistry>, has_credentials: bool) -> Self {
        Self {
            registry,
            has_credentials,
        }
    }

    /// Handle one raw JSON-RPC message.
    ///
    /// Returns `None` for notifications, which never get a reply.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(e) => return Some(self.error_response(None, McpError::ParseError(e.to_string()))),
        };

        // Well-formed JSON that is not a request still gets its id echoed back.
        let id = message
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<JsonRpcId>(id).ok());

        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(self.error_response(id, McpError::InvalidRequest(e.to_string()))),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "Handling MCP request");

        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }

        let id = request.id.clone();
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(self.error_response(
                id,
                McpError::InvalidRequest(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
            ));
        }

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            "resources/list" => to_value(ResourcesListResult {
                resources: resources::list_resources(),
            }),
            "resources/read" => self.handle_resources_read(request.params),
            "prompts/list" => to_value(PromptsListResult {
                prompts: prompts::get_all_prompts(),
            }),
            "prompts/get" => self.handle_prompts_get(request.params),
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        let response = match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => self.error_response(id, e),
        };

        debug!(
            method = %request.method,
            has_error = response.error.is_some(),
            "Completed MCP request"
        );

        Some(response)
    }

    fn handle_initialize(&self, params: Value) -> Result<Value, McpError> {
        let params: InitializeParams = parse_params(params)?;
        let protocol_version = negotiate_version(params.protocol_version.as_deref());

        if let Some(client) = &params.client_info {
            debug!(client = %client.name, version = %client.version, protocol_version, "Client initialized");
        }

        to_value(InitializeResult {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ListChangedCapability::default()),
                resources: Some(ResourceCapabilities::default()),
                prompts: Some(ListChangedCapability::default()),
            },
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        })
    }

    fn handle_tools_list(&self) -> Result<Value, McpError> {
        let tools = self
            .registry
            .list()
            .into_iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();

        to_value(ToolsListResult { tools })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: ToolCallParams = parse_params(params)?;
        let envelope = self.registry.call(&params.name, params.arguments).await;

        let structured = serde_json::to_value(&envelope)?;
        to_value(ToolCallResult {
            content: vec![ContentBlock::Text {
                text: structured.to_string(),
            }],
            structured_content: Some(structured),
            // Failures travel inside the envelope, like any other result.
            is_error: false,
        })
    }

    fn handle_resources_read(&self, params: Value) -> Result<Value, McpError> {
        let params: ResourceReadParams = parse_params(params)?;
        let contents = resources::read_resource(&params.uri, self.has_credentials)?;
        to_value(ResourceReadResult {
            contents: vec![contents],
        })
    }

    fn handle_prompts_get(&self, params: Value) -> Result<Value, McpError> {
        let params: PromptGetParams = parse_params(params)?;
        to_value(prompts::get_prompt(&params.name, params.arguments)?)
    }

    fn error_response(&self, id: Option<JsonRpcId>, error: McpError) -> JsonRpcResponse {
        warn!(error = %error, "MCP request failed");
        JsonRpcResponse::failure(id, error.into())
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, McpError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, McpError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::gateway::GatewayClient;
    use crate::mcp::protocol::error_codes;
    use crate::tools::create_default_registry;

    fn create_test_handler() -> McpHandler {
        let settings = Settings {
            jwt_token: Some("token".to_string()),
            ..Settings::default()
        };
        let client = Arc::new(GatewayClient::new(&settings).unwrap());
        McpHandler::new(Arc::new(create_default_registry(client)), true)
    }

    fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(id)),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn test_version_negotiation() {
        assert_eq!(negotiate_version(Some("2024-11-05")), "2024-11-05");
        assert_eq!(negotiate_version(Some("1999-01-01")), SUPPORTED_PROTOCOL_VERSIONS[0]);
        assert_eq!(negotiate_version(None), SUPPORTED_PROTOCOL_VERSIONS[0]);
    }

    #[tokio::test]
    async fn test_initialize() {
        let handler = create_test_handler();
        let response = handler
            .handle_request(request(
                1,
                "initialize",
                json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0"}
                }),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["instructions"].as_str().unwrap().contains("co-pilot"));
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let handler = create_test_handler();
        let response = handler
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let handler = create_test_handler();
        let response = handler.handle_message("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::PARSE_ERROR);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_valid_json_that_is_not_a_request() {
        let handler = create_test_handler();

        let response = handler.handle_message(r#"{"jsonrpc":"2.0","id":7}"#).await.unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
        assert_eq!(response.id, Some(JsonRpcId::Number(7)));

        let response = handler.handle_message("[1, 2, 3]").await.unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_method_not_found() {
        let handler = create_test_handler();
        let response = handler
            .handle_request(request(2, "sampling/createMessage", Value::Null))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let handler = create_test_handler();
        let response = handler
            .handle_request(request(3, "tools/list", Value::Null))
            .await
            .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 5);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let handler = create_test_handler();
        let response = handler
            .handle_request(request(4, "tools/call", json!({"arguments": {}})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_resources_and_prompts() {
        let handler = create_test_handler();

        let response = handler
            .handle_request(request(5, "resources/list", Value::Null))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["resources"].as_array().unwrap().len(), 2);

        let response = handler
            .handle_request(request(6, "resources/read", json!({"uri": "user://profile"})))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["contents"][0]["uri"], "user://profile");

        let response = handler
            .handle_request(request(
                7,
                "prompts/get",
                json!({"name": "financial_advisor_prompt", "arguments": {"user_query": "SIP or lump sum?"}}),
            ))
            .await
            .unwrap();
        let text = response.result.unwrap()["messages"][0]["content"]["text"].clone();
        assert!(text.as_str().unwrap().contains("SIP or lump sum?"));
    }
}
