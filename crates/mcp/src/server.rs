// MCP server: newline-delimited JSON-RPC over stdio

use crate::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use crate::tools::{ToolError, ToolRegistry};
use anyhow::Result;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{AnyDelimiterCodec, FramedRead, FramedWrite, LinesCodec};

/// Dispatches JSON-RPC requests to the tool registry.
///
/// Requests are handled strictly one at a time, and every response is
/// written before the next line is read.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve on the process's stdin and stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        tracing::info!("MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing one response line per request
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // Lines are split as raw bytes so a line that is not valid UTF-8
        // fails to parse like any other malformed request
        let mut lines = FramedRead::new(
            reader,
            AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec()),
        );
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        while let Some(line) = lines.next().await {
            let line = line?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_slice(&line) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!("Failed to parse request: {}", e);
                    continue;
                }
            };

            if let Some(response) = self.handle_request(request).await {
                sink.send(serde_json::to_string(&response)?).await?;
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one request; notifications produce no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() || request.method == "initialized" {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        tracing::debug!(method = %request.method, "Handling request");

        let response = match request.method.as_str() {
            "initialize" => {
                let result = InitializeResult::litmus();
                to_response(id, serde_json::to_value(result))
            }
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.registry.list_schemas(),
                };
                to_response(id, serde_json::to_value(result))
            }
            "tools/call" => match self.call_tool(request.params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
            },
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };

        Some(response)
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| anyhow::anyhow!("failed to parse call tool params: {}", e))?;

        if !(params.arguments.is_null() || params.arguments.is_object()) {
            anyhow::bail!("failed to parse arguments: expected an object");
        }

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| ToolError::UnknownTool(params.name.clone()))?;

        tracing::info!(tool = %params.name, "Calling tool");

        match tool.execute(params.arguments).await {
            Ok(result) => Ok(serde_json::to_value(result)?),
            Err(e) => {
                tracing::warn!(tool = %params.name, "Tool call failed: {}", e);
                Err(e)
            }
        }
    }
}

fn to_response(id: Value, result: serde_json::Result<Value>) -> JsonRpcResponse {
    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolDefaults;
    use crate::tools::litmus_tools;
    use crate::tools::testing::StubExecutor;
    use serde_json::json;
    use std::sync::Arc;

    fn server_with(stub: StubExecutor) -> McpServer {
        McpServer::new(litmus_tools(Arc::new(stub), &ToolDefaults::default()))
    }

    async fn exchange(server: &McpServer, input: impl AsRef<[u8]>) -> Vec<Value> {
        let mut output = Vec::new();
        server.serve(input.as_ref(), &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n",
        )
        .await;

        assert_eq!(responses.len(), 1);
        let result = &responses[0]["result"];
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["capabilities"], json!({"tools": {}}));
        assert_eq!(result["serverInfo"]["name"], "litmuschaos-mcp-server");
        assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_tools_list_with_string_id() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":\"abc\",\"method\":\"tools/list\"}\n",
        )
        .await;

        assert_eq!(responses[0]["id"], "abc");
        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 16);
        assert_eq!(tools[0]["name"], "list_chaos_experiments");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"resources/list\"}\n",
        )
        .await;

        assert_eq!(
            responses[0]["error"],
            json!({"code": -32601, "message": "Method not found: resources/list"})
        );
        assert!(responses[0].get("result").is_none());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"tools/call\",\"params\":{\"name\":\"delete_everything\",\"arguments\":{}}}\n",
        )
        .await;

        assert_eq!(
            responses[0]["error"],
            json!({"code": -32603, "message": "unknown tool: delete_everything"})
        );
    }

    #[tokio::test]
    async fn test_missing_required_argument_is_an_error() {
        let stub = StubExecutor::new().respond(
            "runChaosExperiment",
            json!({"runChaosExperiment": {"notifyID": "n"}}),
        );
        let server = server_with(stub);
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"tools/call\",\"params\":{\"name\":\"run_chaos_experiment\",\"arguments\":{}}}\n",
        )
        .await;

        assert_eq!(responses[0]["error"]["code"], -32603);
        assert_eq!(responses[0]["error"]["message"], "experimentId is required");
        assert!(responses[0].get("result").is_none());
    }

    #[tokio::test]
    async fn test_remote_errors_are_reported() {
        let stub = StubExecutor::new().fail("listEnvironments", "not authorized, project not found");
        let server = server_with(stub);
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"tools/call\",\"params\":{\"name\":\"list_environments\"}}\n",
        )
        .await;

        assert_eq!(
            responses[0]["error"]["message"],
            "GraphQL errors: not authorized, project not found"
        );
    }

    #[tokio::test]
    async fn test_successful_call_returns_single_text_item() {
        let stub = StubExecutor::new().respond(
            "runChaosExperiment",
            json!({"runChaosExperiment": {"notifyID": "notify-1"}}),
        );
        let server = server_with(stub);
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":6,\"method\":\"tools/call\",\"params\":{\"name\":\"run_chaos_experiment\",\"arguments\":{\"experimentId\":\"exp-1\"}}}\n",
        )
        .await;

        let content = responses[0]["result"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");

        let text = content[0]["text"].as_str().unwrap();
        assert!(text.contains('\n'));
        let document: Value = serde_json::from_str(text).unwrap();
        assert_eq!(document["notifyId"], "notify-1");
    }

    #[tokio::test]
    async fn test_non_object_arguments_rejected() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"tools/call\",\"params\":{\"name\":\"list_environments\",\"arguments\":[1]}}\n",
        )
        .await;

        assert_eq!(responses[0]["error"]["code"], -32603);
    }

    #[tokio::test]
    async fn test_malformed_lines_and_notifications_are_silent() {
        let server = server_with(StubExecutor::new());
        let input = concat!(
            "not json at all\n",
            "\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"initialized\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":8,\"method\":\"tools/list\"}\n",
        );

        let responses = exchange(&server, input).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 8);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_dropped() {
        let server = server_with(StubExecutor::new());
        let input: &[u8] = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"x\",\"params\":\"\xff\"}\n\
{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n";

        let responses = exchange(&server, input).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 2);
        assert!(responses[0]["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_served() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}",
        )
        .await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_null_id_gets_a_response() {
        let server = server_with(StubExecutor::new());
        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":null,\"method\":\"tools/list\"}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"tools/list\"}\n",
        );

        let responses = exchange(&server, input).await;

        assert_eq!(responses.len(), 1);
        let response = responses[0].as_object().unwrap();
        assert_eq!(response.get("id"), Some(&Value::Null));
        assert!(response["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_initialized_with_id_is_silent() {
        let server = server_with(StubExecutor::new());
        let responses = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialized\"}\n",
        )
        .await;

        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_responses_follow_request_order() {
        let server = server_with(StubExecutor::new());
        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"nope\"}\r\n",
        );

        let ids: Vec<_> = exchange(&server, input)
            .await
            .into_iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn test_handle_request_directly() {
        let server = server_with(StubExecutor::new());

        assert!(server
            .handle_request(JsonRpcRequest::notification("initialized"))
            .await
            .is_none());

        let response = server
            .handle_request(JsonRpcRequest::new(9, "tools/list", None))
            .await
            .unwrap();
        assert!(response.error.is_none());
        assert_eq!(server.registry().len(), 16);
    }
}
