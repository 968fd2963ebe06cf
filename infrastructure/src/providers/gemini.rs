//! Google Gemini adapter (`streamGenerateContent` with `alt=sse`).

use super::openai_compat::assemble_call;
use super::sse::{EventParser, spawn_event_stream};
use super::{SessionParams, check_status, map_request_error};
use arena_application::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
use arena_domain::{Message, ModelSpec, Role, StreamEvent, ToolDefinition, split_system};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

/// Session against the Generative Language API
pub struct GeminiSession {
    params: SessionParams,
}

impl GeminiSession {
    pub fn new(params: SessionParams) -> Self {
        Self { params }
    }

    fn build_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> Value {
        let (system, rest) = split_system(messages);
        let contents: Vec<Value> = rest
            .iter()
            .map(|m| {
                let role = if m.role == Role::Assistant { "model" } else { "user" };
                json!({ "role": role, "parts": [{ "text": m.content }] })
            })
            .collect();
        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": self.params.temperature,
                "maxOutputTokens": self.params.max_tokens,
            },
        });
        if let Some(system) = system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if !tools.is_empty() {
            let declarations: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_schema(),
                    })
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }
        body
    }

    async fn stream(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<StreamHandle, GatewayError> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.params.base_url.trim_end_matches('/'),
            self.params.model.model_name
        );
        debug!("POST {}", url);

        let mut request = self
            .params
            .client
            .post(&url)
            .json(&self.build_body(messages, tools));
        if let Some(key) = &self.params.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request.send().await.map_err(map_request_error)?;
        let response = check_status(response).await?;
        Ok(spawn_event_stream(response, GenerateContentParser))
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
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

/// Translates `GenerateContentResponse` chunks.
///
/// Gemini sends function calls whole, so no state is needed.
pub struct GenerateContentParser;

impl EventParser for GenerateContentParser {
    fn parse(&mut self, data: &str, out: &mut Vec<StreamEvent>) -> bool {
        let Ok(chunk) = serde_json::from_str::<Value>(data) else {
            debug!("Skipping unparseable chunk: {}", data);
            return false;
        };
        if let Some(error) = chunk.get("error") {
            let message = error["message"].as_str().unwrap_or("unknown error");
            out.push(StreamEvent::Error(message.to_string()));
            return true;
        }

        let Some(candidate) = chunk["candidates"].get(0) else {
            return false;
        };
        if let Some(parts) = candidate["content"]["parts"].as_array() {
            for part in parts {
                if let Some(text) = part["text"].as_str()
                    && !text.is_empty()
                {
                    out.push(StreamEvent::Delta(text.to_string()));
                }
                if let Some(call) = part.get("functionCall") {
                    let name = call["name"].as_str().unwrap_or_default().to_string();
                    let args = call.get("args").map(Value::to_string).unwrap_or_default();
                    out.push(StreamEvent::ToolCall(assemble_call(None, name, &args)));
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_function_call_parts() {
        let mut parser = GenerateContentParser;
        let mut out = Vec::new();
        parser.parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Consider this: "}]}}]}"#,
            &mut out,
        );
        parser.parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"functionCall":{"name":"web_search","args":{"query":"rent control studies"}}}]},"finishReason":"STOP"}]}"#,
            &mut out,
        );
        assert_eq!(out[0], StreamEvent::Delta("Consider this: ".to_string()));
        let StreamEvent::ToolCall(call) = &out[1] else {
            panic!("expected tool call");
        };
        assert_eq!(call.tool_name, "web_search");
        assert_eq!(call.get_string("query"), Some("rent control studies"));
    }

    #[test]
    fn test_roles_and_system_instruction() {
        let session = GeminiSession::new(SessionParams::for_test(arena_domain::Provider::Google));
        let body = session.build_body(
            &[
                Message::system("You are the Conservative Perspective."),
                Message::user("Opening"),
                Message::assistant("My view"),
            ],
            &[arena_domain::web_search_definition()],
        );
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are the Conservative Perspective."
        );
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "web_search"
        );
    }

    #[test]
    fn test_error_chunk() {
        let mut out = Vec::new();
        assert!(GenerateContentParser.parse(r#"{"error":{"code":429,"message":"quota"}}"#, &mut out));
        assert_eq!(out, [StreamEvent::Error("quota".to_string())]);
    }
}
