use crate::agentic::tool_calls::{call_id_text, decode_record, extract_tool_calls};
use crate::infrastructure::ai::ModelRunner;
use crate::service::config::{
    HistoryContentMode, ProcessorConfig, ToolResultIdMode, COMPAT_TOOL_CALL_ID,
};
use crate::util::errors::{ToolChatError, ToolChatResult};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use toolchat_core_types::{
    EncodedRecord, Message, ProcessOutput, RequestBundle, ResponseRecord, ToolSchema,
};

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    role: String,
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ToolResultEntry {
    content: Value,
    name: String,
    #[serde(default)]
    tool_call_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

fn content_text(content: Value) -> String {
    match content {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turns one serialized chat-with-tools request into a single model invocation.
///
/// Holds no per-request state; the tool schema is bound to a fresh runner handle
/// on every call, so one processor can serve concurrent requests.
pub struct ChatWithToolsProcessor {
    runner: Arc<dyn ModelRunner>,
    config: ProcessorConfig,
}

impl ChatWithToolsProcessor {
    pub fn new(runner: Arc<dyn ModelRunner>) -> Self {
        Self::with_config(runner, ProcessorConfig::default())
    }

    pub fn with_config(runner: Arc<dyn ModelRunner>, config: ProcessorConfig) -> Self {
        Self { runner, config }
    }

    /// Build the ordered message sequence: system, history, user input, tool results.
    pub fn assemble_messages(&self, bundle: &RequestBundle) -> ToolChatResult<Vec<Message>> {
        let mut messages = Vec::with_capacity(bundle.history.len() + 2);
        messages.push(Message::system(bundle.system_prompt.as_str()));

        for (index, raw) in bundle.history.iter().enumerate() {
            let entry: HistoryEntry = decode_record(raw).map_err(|e| {
                ToolChatError::decode(format!("Invalid history entry #{}: {}", index, e))
            })?;
            let content = match self.config.history_content {
                HistoryContentMode::SystemPrompt => bundle.system_prompt.clone(),
                HistoryContentMode::Entry => content_text(entry.content),
            };
            match entry.role.as_str() {
                "assistant" => messages.push(Message::assistant(content)),
                "human" | "user" => messages.push(Message::user(content)),
                other => debug!("Skipping history entry #{} with role '{}'", index, other),
            }
        }

        messages.push(Message::user(bundle.input.as_str()));

        if let Some(raw) = &bundle.tool_message {
            messages.extend(self.tool_result_messages(raw));
        }

        Ok(messages)
    }

    fn tool_result_messages(&self, raw: &EncodedRecord) -> Vec<Message> {
        let entries = match decode_record::<Vec<EncodedRecord>>(raw).and_then(|items| {
            items
                .iter()
                .map(decode_record::<ToolResultEntry>)
                .collect::<Result<Vec<_>, _>>()
        }) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Ignoring undecodable tool_message: {}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .map(|entry| {
                let tool_call_id = match self.config.tool_result_id {
                    ToolResultIdMode::Fixed => COMPAT_TOOL_CALL_ID.to_string(),
                    ToolResultIdMode::Entry => call_id_text(entry.tool_call_id)
                        .or_else(|| call_id_text(entry.id))
                        .unwrap_or_else(|| COMPAT_TOOL_CALL_ID.to_string()),
                };
                Message::tool(content_text(entry.content), entry.name, tool_call_id)
            })
            .collect()
    }

    /// Run one request and return the normalized response record.
    ///
    /// Native tool calls from the runner are used as-is; otherwise the text
    /// output goes through the fallback extractor.
    pub async fn process_record(&self, bundle: &RequestBundle) -> ToolChatResult<ResponseRecord> {
        let schema: ToolSchema = decode_record(&bundle.tools)
            .map_err(|e| ToolChatError::tool_schema(e.reason))?;
        let tool_count = schema.len();
        let bound = self.runner.bind_tools(schema);

        let messages = self.assemble_messages(bundle)?;
        debug!(
            "Invoking model runner: messages={}, tools={}",
            messages.len(),
            tool_count
        );

        let response = bound.invoke(&messages).await?;
        if response.has_tool_calls() {
            debug!(
                "Runner returned {} native tool call(s)",
                response.tool_calls.len()
            );
            return Ok(response);
        }

        Ok(extract_tool_calls(&response.content))
    }

    pub async fn process(&self, bundle: &RequestBundle) -> ToolChatResult<ProcessOutput> {
        let record = self.process_record(bundle).await?;
        Ok(ProcessOutput {
            tool_calls: serde_json::to_string(&record.tool_calls)?,
            output: record.content,
        })
    }
}
