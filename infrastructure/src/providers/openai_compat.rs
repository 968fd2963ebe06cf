//! OpenAI chat-completions adapter.
//!
//! Serves OpenAI itself and every provider exposing the same wire format
//! (Groq, DeepSeek, OpenRouter, Ollama's `/v1` endpoint).

use super::sse::{EventParser, spawn_event_stream};
use super::{SessionParams, check_status, map_request_error};
use arena_application::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
use arena_domain::{Message, ModelSpec, Provider, StreamEvent, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Session against a `/chat/completions` endpoint
pub struct OpenAiCompatSession {
    params: SessionParams,
}

impl OpenAiCompatSession {
    pub fn new(params: SessionParams) -> Self {
        Self { params }
    }

    fn build_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> Value {
        let model = &self.params.model.model_name;
        let mut body = json!({
            "model": model,
            "messages": messages
                .iter()
                .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
                .collect::<Vec<_>>(),
            "stream": true,
        });
        // Reasoning models accept neither a temperature nor `max_tokens`
        if is_reasoning_model(model) {
            body["max_completion_tokens"] = json!(self.params.max_tokens);
        } else {
            body["temperature"] = json!(self.params.temperature);
            body["max_tokens"] = json!(self.params.max_tokens);
        }
        if !tools.is_empty() {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters_schema(),
                        }
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
        let url = format!("{}/chat/completions", self.params.base_url.trim_end_matches('/'));
        debug!("POST {} ({})", url, self.params.model.model_name);

        let mut request = self
            .params
            .client
            .post(&url)
            .json(&self.build_body(messages, tools));
        if let Some(key) = &self.params.api_key {
            request = request.bearer_auth(key);
        }
        if self.params.model.provider == Provider::OpenRouter {
            request = request
                .header("HTTP-Referer", "https://github.com/debate-arena/debate-arena")
                .header("X-Title", "debate-arena");
        }

        let response = request.send().await.map_err(map_request_error)?;
        let response = check_status(response).await?;
        Ok(spawn_event_stream(response, ChatCompletionParser::default()))
    }
}

#[async_trait]
impl LlmSession for OpenAiCompatSession {
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

fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("gpt-5") || model.starts_with("o1") || model.starts_with("o3")
}

/// Tool call assembled from indexed fragments
#[derive(Debug, Default)]
struct PartialCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

/// Translates `chat.completion.chunk` payloads
#[derive(Debug, Default)]
pub struct ChatCompletionParser {
    calls: BTreeMap<u64, PartialCall>,
}

impl ChatCompletionParser {
    fn flush_calls(&mut self, out: &mut Vec<StreamEvent>) {
        for (_, partial) in std::mem::take(&mut self.calls) {
            out.push(StreamEvent::ToolCall(assemble_call(
                partial.id,
                partial.name,
                &partial.arguments,
            )));
        }
    }
}

impl EventParser for ChatCompletionParser {
    fn parse(&mut self, data: &str, out: &mut Vec<StreamEvent>) -> bool {
        if data.trim() == "[DONE]" {
            self.flush_calls(out);
            return true;
        }
        let Ok(chunk) = serde_json::from_str::<Value>(data) else {
            debug!("Skipping unparseable chunk: {}", data);
            return false;
        };
        if let Some(error) = chunk.get("error") {
            let message = error["message"].as_str().unwrap_or("unknown error");
            out.push(StreamEvent::Error(message.to_string()));
            return true;
        }

        let Some(choice) = chunk["choices"].get(0) else {
            return false;
        };
        let delta = &choice["delta"];
        if let Some(text) = delta["content"].as_str()
            && !text.is_empty()
        {
            out.push(StreamEvent::Delta(text.to_string()));
        }
        if let Some(fragments) = delta["tool_calls"].as_array() {
            for fragment in fragments {
                let index = fragment["index"].as_u64().unwrap_or(0);
                let partial = self.calls.entry(index).or_default();
                if let Some(id) = fragment["id"].as_str() {
                    partial.id = Some(id.to_string());
                }
                if let Some(name) = fragment["function"]["name"].as_str() {
                    partial.name.push_str(name);
                }
                if let Some(args) = fragment["function"]["arguments"].as_str() {
                    partial.arguments.push_str(args);
                }
            }
        }
        if choice["finish_reason"].is_string() {
            self.flush_calls(out);
        }
        false
    }

    fn finish(&mut self, out: &mut Vec<StreamEvent>) {
        self.flush_calls(out);
    }
}

/// Build a [`ToolCall`] from a raw JSON argument string.
///
/// Unparseable arguments yield an empty argument map; the filter then
/// rejects the call instead of the turn failing.
pub(crate) fn assemble_call(id: Option<String>, name: String, raw_arguments: &str) -> ToolCall {
    let arguments: HashMap<String, Value> = match serde_json::from_str::<Value>(raw_arguments) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => HashMap::new(),
    };
    ToolCall {
        id,
        tool_name: name,
        arguments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(payloads: &[&str]) -> (Vec<StreamEvent>, bool) {
        let mut parser = ChatCompletionParser::default();
        let mut out = Vec::new();
        let mut done = false;
        for payload in payloads {
            done = parser.parse(payload, &mut out);
        }
        parser.finish(&mut out);
        (out, done)
    }

    #[test]
    fn test_text_deltas_and_done() {
        let (events, done) = parse_all(&[
            r#"{"choices":[{"delta":{"role":"assistant"}}]}"#,
            r#"{"choices":[{"delta":{"content":"Hello"}}]}"#,
            r#"{"choices":[{"delta":{"content":" there"},"finish_reason":null}]}"#,
            "[DONE]",
        ]);
        assert!(done);
        assert_eq!(
            events,
            [
                StreamEvent::Delta("Hello".to_string()),
                StreamEvent::Delta(" there".to_string())
            ]
        );
    }

    #[test]
    fn test_tool_call_fragments_assembled() {
        let (events, _) = parse_all(&[
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_1","function":{"name":"web_search","arguments":""}}]}}]}"#,
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"query\": \"min"}}]}}]}"#,
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"imum wage\"}"}}]}}]}"#,
            r#"{"choices":[{"delta":{},"finish_reason":"tool_calls"}]}"#,
            "[DONE]",
        ]);
        assert_eq!(events.len(), 1);
        let StreamEvent::ToolCall(call) = &events[0] else {
            panic!("expected tool call");
        };
        assert_eq!(call.id.as_deref(), Some("call_1"));
        assert_eq!(call.tool_name, "web_search");
        assert_eq!(call.get_string("query"), Some("minimum wage"));
    }

    #[test]
    fn test_error_payload() {
        let (events, done) = parse_all(&[r#"{"error":{"message":"rate limited"}}"#]);
        assert!(done);
        assert_eq!(events, [StreamEvent::Error("rate limited".to_string())]);
    }

    #[test]
    fn test_invalid_arguments_become_empty() {
        let call = assemble_call(None, "web_search".to_string(), "{not json");
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_reasoning_models() {
        assert!(is_reasoning_model("gpt-5"));
        assert!(!is_reasoning_model("gpt-4o-mini"));
    }
}
