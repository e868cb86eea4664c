//! OpenAI-compatible chat completions runner
//!
//! Targets local inference servers (llama.cpp `server`, vLLM, Ollama) that expose
//! `/v1/chat/completions`. Requests are non-streaming; one HTTP round trip per
//! invocation.

use crate::agentic::tool_calls::fallback::{normalize_arguments, synthetic_call_id};
use crate::infrastructure::ai::runner::{BoundRunner, ModelRunner};
use crate::service::config::RunnerConfig;
use crate::util::errors::{ToolChatError, ToolChatResult};
use async_trait::async_trait;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use toolchat_core_types::{Message, ResponseRecord, ToolCall, ToolDefinition, ToolSchema};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OpenAITool<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> From<&'a Message> for OpenAIMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
            name: message.name.as_deref(),
            tool_call_id: message.tool_call_id.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAITool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize, Clone)]
struct OpenAIToolCall {
    id: Option<String>,
    function: Option<FunctionCall>,
}

#[derive(Debug, Deserialize, Clone)]
struct FunctionCall {
    name: Option<String>,
    arguments: Option<String>,
}

impl OpenAIToolCall {
    fn into_tool_call(self) -> Result<ToolCall, String> {
        let function = self
            .function
            .ok_or_else(|| "tool call without function".to_string())?;
        let name = function
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| "tool call without function name".to_string())?;
        let args = normalize_arguments(function.arguments.map(Value::String))
            .map_err(|e| format!("tool call '{}': {}", name, e))?;

        Ok(ToolCall {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(synthetic_call_id),
            name,
            args,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<OpenAIUsage>,
}

impl ChatCompletionResponse {
    fn into_response_record(self) -> ToolChatResult<ResponseRecord> {
        if let Some(usage) = &self.usage {
            debug!(
                "Chat completion usage: prompt_tokens={}, completion_tokens={}, total_tokens={}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let Some(choice) = self.choices.into_iter().next() else {
            return Err(ToolChatError::runner("Chat completion returned no choices"));
        };
        debug!(
            "Chat completion finished: finish_reason={}",
            choice.finish_reason.as_deref().unwrap_or("<missing>")
        );

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tool_call| match tool_call.into_tool_call() {
                Ok(call) => Some(call),
                Err(e) => {
                    warn!("Dropping malformed native tool call: {}", e);
                    None
                }
            })
            .collect();

        Ok(ResponseRecord::assistant(
            choice.message.content.unwrap_or_default(),
            tool_calls,
        ))
    }
}

fn extract_api_error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    let Some(error) = json.get("error") else {
        return body.to_string();
    };
    if let Some(message) = error.get("message").and_then(|value| value.as_str()) {
        return message.to_string();
    }
    if let Some(message) = error.as_str() {
        return message.to_string();
    }
    body.to_string()
}

/// Model runner for any server speaking the OpenAI chat completions protocol.
#[derive(Clone)]
pub struct OpenAICompatRunner {
    client: reqwest::Client,
    config: Arc<RunnerConfig>,
}

impl OpenAICompatRunner {
    pub fn new(config: RunnerConfig) -> ToolChatResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ToolChatError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

impl ModelRunner for OpenAICompatRunner {
    fn bind_tools(&self, schema: ToolSchema) -> Box<dyn BoundRunner> {
        Box::new(BoundOpenAIRunner {
            runner: self.clone(),
            schema,
        })
    }
}

struct BoundOpenAIRunner {
    runner: OpenAICompatRunner,
    schema: ToolSchema,
}

#[async_trait]
impl BoundRunner for BoundOpenAIRunner {
    async fn invoke(&self, messages: &[Message]) -> ToolChatResult<ResponseRecord> {
        let config = self.runner.config();
        let body = ChatCompletionRequest {
            model: &config.model,
            messages: messages.iter().map(OpenAIMessage::from).collect(),
            tools: self
                .schema
                .iter()
                .map(|function| OpenAITool {
                    tool_type: "function",
                    function,
                })
                .collect(),
            stream: false,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let endpoint = self.runner.endpoint();
        debug!(
            "Sending chat completion: endpoint={}, messages={}, tools={}",
            endpoint,
            body.messages.len(),
            body.tools.len()
        );

        let mut request = self.runner.client.post(&endpoint).json(&body);
        if let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;
        trace!("Chat completion response: status={}, body={}", status, raw);

        if !status.is_success() {
            return Err(ToolChatError::runner(format!(
                "Chat completion failed: status={}, error={}",
                status,
                extract_api_error_message(&raw)
            )));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&raw).map_err(|e| {
            ToolChatError::runner(format!("Chat completion schema error: {}, data: {}", e, raw))
        })?;
        completion.into_response_record()
    }
}
