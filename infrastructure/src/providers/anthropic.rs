//! Anthropic Messages API adapter.

use super::openai_compat::assemble_call;
use super::sse::{EventParser, spawn_event_stream};
use super::{SessionParams, check_status, map_request_error};
use arena_application::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
use arena_domain::{Message, ModelSpec, StreamEvent, ToolDefinition, split_system};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

/// Session against `/v1/messages`
pub struct AnthropicSession {
    params: SessionParams,
}

impl AnthropicSession {
    pub fn new(params: SessionParams) -> Self {
        Self { params }
    }

    fn build_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> Value {
        let (system, rest) = split_system(messages);
        let mut body = json!({
            "model": self.params.model.model_name,
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
            "messages": rest
                .iter()
                .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
                .collect::<Vec<_>>(),
            "stream": true,
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }
        if !tools.is_empty() {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "input_schema": t.parameters_schema(),
                    })
                })
                .collect();
        }
        body
    }

    async fn stream(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<StreamHandle, GatewayError> {
        let url = format!("{}/v1/messages", self.params.base_url.trim_end_matches('/'));
        debug!("POST {} ({})", url, self.params.model.model_name);

        let mut request = self
            .params
            .client
            .post(&url)
            .header("anthropic-version", API_VERSION)
            .json(&self.build_body(messages, tools));
        if let Some(key) = &self.params.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(map_request_error)?;
        let response = check_status(response).await?;
        Ok(spawn_event_stream(response, MessagesParser::default()))
    }
}

#[async_trait]
impl LlmSession for AnthropicSession {
    fn model(&self) -> &ModelSpec {
        &self.params.model
    }

    async fn send(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.stream(messages, &[]).await?.collect_text().await
    }

    async fn send_streaming(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        self.stream(messages, &[]).await
    }

    async fn send_streaming_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<StreamHandle, GatewayError> {
        self.stream(messages, tools).await
    }
}

#[derive(Debug, Default)]
struct ToolUseBlock {
    id: Option<String>,
    name: String,
    input_json: String,
}

/// Translates Messages API stream events
#[derive(Debug, Default)]
pub struct MessagesParser {
    tool_blocks: HashMap<u64, ToolUseBlock>,
}

impl EventParser for MessagesParser {
    fn parse(&mut self, data: &str, out: &mut Vec<StreamEvent>) -> bool {
        let Ok(event) = serde_json::from_str::<Value>(data) else {
            debug!("Skipping unparseable event: {}", data);
            return false;
        };
        let index = event["index"].as_u64().unwrap_or(0);

        match event["type"].as_str().unwrap_or_default() {
            "content_block_start" => {
                let block = &event["content_block"];
                if block["type"] == "tool_use" {
                    self.tool_blocks.insert(
                        index,
                        ToolUseBlock {
                            id: block["id"].as_str().map(str::to_string),
                            name: block["name"].as_str().unwrap_or_default().to_string(),
                            input_json: String::new(),
                        },
                    );
                }
            }
            "content_block_delta" => {
                let delta = &event["delta"];
                match delta["type"].as_str().unwrap_or("text_delta") {
                    "input_json_delta" => {
                        if let Some(block) = self.tool_blocks.get_mut(&index) {
                            block.input_json.push_str(delta["partial_json"].as_str().unwrap_or(""));
                        }
                    }
                    _ => {
                        if let Some(text) = delta["text"].as_str()
                            && !text.is_empty()
                        {
                            out.push(StreamEvent::Delta(text.to_string()));
                        }
                    }
                }
            }
            "content_block_stop" => {
                if let Some(block) = self.tool_blocks.remove(&index) {
                    let raw = if block.input_json.trim().is_empty() {
                        "{}"
                    } else {
                        block.input_json.as_str()
                    };
                    out.push(StreamEvent::ToolCall(assemble_call(block.id, block.name, raw)));
                }
            }
            "message_stop" => return true,
            "error" => {
                let message = event["error"]["message"].as_str().unwrap_or("unknown error");
                out.push(StreamEvent::Error(message.to_string()));
                return true;
            }
            _ => {}
        }
        false
    }
}
