use crate::tool::ToolCall;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque record as it arrives from the caller.
///
/// Callers either pass JSON text (the serialized record) or the already
/// structured value; both go through the same typed decode step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedRecord {
    Text(String),
    Inline(Value),
}

impl From<&str> for EncodedRecord {
    fn from(value: &str) -> Self {
        EncodedRecord::Text(value.to_string())
    }
}

impl From<String> for EncodedRecord {
    fn from(value: String) -> Self {
        EncodedRecord::Text(value)
    }
}

impl From<Value> for EncodedRecord {
    fn from(value: Value) -> Self {
        EncodedRecord::Inline(value)
    }
}

/// One chat-with-tools invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBundle {
    /// Encoded array of tool definitions
    pub tools: EncodedRecord,
    pub system_prompt: String,
    /// Prior turns, each an encoded `{role, content}` record
    #[serde(default)]
    pub history: Vec<EncodedRecord>,
    /// Current user turn
    pub input: String,
    /// Encoded array of `{content, name}` tool results for this turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_message: Option<EncodedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub output: String,
    /// JSON-encoded array of `{id, name, args}`
    pub tool_calls: String,
}

impl ProcessOutput {
    pub fn decode_tool_calls(&self) -> serde_json::Result<Vec<ToolCall>> {
        serde_json::from_str(&self.tool_calls)
    }
}
