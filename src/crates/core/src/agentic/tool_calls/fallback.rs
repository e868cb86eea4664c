//! Fallback tool-call extraction from free-form model output.
//!
//! Small local models often ignore the runner's native tool-call channel and
//! instead write the call inline:
//!
//! ```text
//! Let me check.
//! <tool_call>
//! {"name": "get_weather", "arguments": {"city": "Rome"}}
//! </tool_call>
//! ```
//!
//! The payload must fit on a single line. The closing tag is matched loosely
//! (`</tool_call>` or `<tool_call>`) since those models frequently drop the slash.

use super::decode::{decode_str, DecodeError};
use log::{debug, warn};
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use toolchat_core_types::{ResponseRecord, ToolCall};

/// Literal suffix some chat templates leave at the end of a turn.
pub const END_OF_TURN_MARKER: &str = "<|im_end|>";

const MAX_SYNTHETIC_CALL_ID: u64 = 10_000_000_000;

static TOOL_CALL_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<tool_call>\n(.+)?\n</?tool_call>").expect("tool call block pattern is valid")
});

#[derive(Debug, Deserialize)]
struct RawToolCall {
    name: String,
    #[serde(default, alias = "args")]
    arguments: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

/// Random call id in `[1, 10_000_000_000]`. Only unique enough for one response.
pub fn synthetic_call_id() -> String {
    rand::thread_rng()
        .gen_range(1..=MAX_SYNTHETIC_CALL_ID)
        .to_string()
}

/// Remove a trailing end-of-turn marker, also when a single newline follows it.
pub fn strip_end_of_turn(text: &str) -> String {
    if let Some(stripped) = text.strip_suffix(END_OF_TURN_MARKER) {
        return stripped.to_string();
    }
    if let Some(stripped) = text
        .strip_suffix('\n')
        .and_then(|rest| rest.strip_suffix(END_OF_TURN_MARKER))
    {
        return format!("{}\n", stripped);
    }
    text.to_string()
}

/// Decode a tool-call argument payload into an object.
///
/// Accepts a structured object, JSON text encoding an object, or nothing.
pub fn normalize_arguments(arguments: Option<Value>) -> Result<Map<String, Value>, DecodeError> {
    match arguments {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(Map::new()),
        Some(Value::String(raw)) => decode_str::<Map<String, Value>>(&raw)
            .map_err(|e| DecodeError::new(format!("invalid encoded arguments: {}", e))),
        Some(other) => Err(DecodeError::new(format!(
            "arguments must be an object, got: {}",
            other
        ))),
    }
}

/// Text form of a call id given as a non-empty string or a number.
pub fn call_id_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn call_id_from(value: Option<Value>) -> String {
    call_id_text(value).unwrap_or_else(synthetic_call_id)
}

fn decode_tool_call(payload: &str) -> Result<ToolCall, DecodeError> {
    let raw: RawToolCall = decode_str(payload)?;
    Ok(ToolCall {
        args: normalize_arguments(raw.arguments)?,
        id: call_id_from(raw.id),
        name: raw.name,
    })
}

fn leading_content(prefix: &str) -> String {
    strip_end_of_turn(prefix.trim()).trim_end().to_string()
}

/// Recover tool calls embedded as `<tool_call>` blocks in raw assistant text.
///
/// A block that fails to decode is logged and skipped; the rest are still
/// extracted. When nothing decodes the whole text comes back as content.
pub fn extract_tool_calls(raw: &str) -> ResponseRecord {
    let mut first_block_start = None;
    let mut tool_calls = Vec::new();

    for captures in TOOL_CALL_BLOCK.captures_iter(raw) {
        let Some(block) = captures.get(0) else {
            continue;
        };
        first_block_start.get_or_insert(block.start());

        let payload = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        match decode_tool_call(payload) {
            Ok(call) => tool_calls.push(call),
            Err(e) => warn!(
                "Failed to parse tool call: payload={}, error={}",
                payload, e
            ),
        }
    }

    if tool_calls.is_empty() {
        return ResponseRecord::assistant(strip_end_of_turn(raw), Vec::new());
    }

    debug!("Recovered {} tool call(s) from text output", tool_calls.len());
    let content = first_block_start
        .map(|start| leading_content(&raw[..start]))
        .unwrap_or_default();
    ResponseRecord::assistant(content, tool_calls)
}

#[cfg(test)]
mod tests {
    use super::{extract_tool_calls, normalize_arguments, strip_end_of_turn};
    use serde_json::json;

    fn block(payload: &str) -> String {
        format!("<tool_call>\n{}\n</tool_call>", payload)
    }

    #[test]
    fn plain_text_passes_through_without_end_of_turn_marker() {
        let record = extract_tool_calls("The weather is fine.<|im_end|>");
        assert_eq!(record.content, "The weather is fine.");
        assert!(record.tool_calls.is_empty());

        let record = extract_tool_calls("No marker here");
        assert_eq!(record.content, "No marker here");
    }

    #[test]
    fn end_of_turn_marker_only_stripped_at_the_end() {
        assert_eq!(strip_end_of_turn("a<|im_end|>b"), "a<|im_end|>b");
        assert_eq!(strip_end_of_turn("done<|im_end|>\n"), "done\n");
        assert_eq!(strip_end_of_turn(""), "");
    }

    #[test]
    fn single_block_with_leading_text() {
        let raw = format!(
            "Let me look that up.\n{}",
            block(r#"{"name": "get_weather", "arguments": {"city": "Rome"}}"#)
        );

        let record = extract_tool_calls(&raw);

        assert_eq!(record.content, "Let me look that up.");
        assert_eq!(record.tool_calls.len(), 1);
        let call = &record.tool_calls[0];
        assert_eq!(call.name, "get_weather");
        assert_eq!(call.args.get("city"), Some(&json!("Rome")));
        assert!(!call.id.is_empty());
    }

    #[test]
    fn synthetic_id_is_a_number_in_range() {
        let record = extract_tool_calls(&block(r#"{"name": "ping"}"#));
        let id: u64 = record.tool_calls[0].id.parse().expect("numeric id");
        assert!((1..=10_000_000_000).contains(&id));
        assert!(record.tool_calls[0].args.is_empty());
    }

    #[test]
    fn supplied_id_is_kept() {
        let record = extract_tool_calls(&block(
            r#"{"id": "call_9", "name": "ping", "arguments": {}}"#,
        ));
        assert_eq!(record.tool_calls[0].id, "call_9");

        let record = extract_tool_calls(&block(r#"{"id": 17, "name": "ping"}"#));
        assert_eq!(record.tool_calls[0].id, "17");
    }

    #[test]
    fn whitespace_only_leading_text_becomes_empty() {
        let raw = format!("  \n\t{}", block(r#"{"name": "ping", "arguments": {}}"#));
        let record = extract_tool_calls(&raw);
        assert_eq!(record.content, "");
        assert_eq!(record.tool_calls.len(), 1);
    }

    #[test]
    fn two_blocks_are_extracted_in_order_around_a_malformed_one() {
        let raw = [
            block(r#"{"name": "first", "arguments": {"n": 1}}"#),
            block(r#"{"name": "broken", "arguments": "#),
            block(r#"{"name": "second", "arguments": {"n": 2}}"#),
        ]
        .join("\n");

        let record = extract_tool_calls(&raw);

        let names: Vec<&str> = record.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(record.content, "");
    }

    #[test]
    fn encoded_string_arguments_are_decoded() {
        let raw = block(r#"{"name": "get_weather", "arguments": "{\"city\": \"Rome\"}"}"#);
        let record = extract_tool_calls(&raw);
        assert_eq!(record.tool_calls[0].args.get("city"), Some(&json!("Rome")));
    }

    #[test]
    fn args_alias_is_accepted() {
        let raw = block(r#"{"name": "get_weather", "args": {"city": "Oslo"}}"#);
        let record = extract_tool_calls(&raw);
        assert_eq!(record.tool_calls[0].args.get("city"), Some(&json!("Oslo")));
    }

    #[test]
    fn loose_closing_tag_is_accepted() {
        let raw = "<tool_call>\n{\"name\": \"ping\"}\n<tool_call>";
        let record = extract_tool_calls(raw);
        assert_eq!(record.tool_calls.len(), 1);
        assert_eq!(record.tool_calls[0].name, "ping");
    }

    #[test]
    fn multi_line_payload_is_not_recognized() {
        let raw = "<tool_call>\n{\n\"name\": \"ping\"\n}\n</tool_call>";
        let record = extract_tool_calls(raw);
        assert!(record.tool_calls.is_empty());
        assert_eq!(record.content, raw);
    }

    #[test]
    fn only_malformed_blocks_fall_back_to_full_text() {
        let raw = format!("Trying.\n{}<|im_end|>", block("not json"));
        let record = extract_tool_calls(&raw);
        assert!(record.tool_calls.is_empty());
        assert_eq!(record.content, format!("Trying.\n{}", block("not json")));
    }

    #[test]
    fn empty_payload_line_is_skipped() {
        let raw = format!(
            "<tool_call>\n\n</tool_call>\n{}",
            block(r#"{"name": "ping"}"#)
        );
        let record = extract_tool_calls(&raw);
        assert_eq!(record.tool_calls.len(), 1);
        assert_eq!(record.content, "");
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        assert!(normalize_arguments(Some(json!([1, 2]))).is_err());
        assert!(normalize_arguments(Some(json!("[1, 2]"))).is_err());
        assert!(normalize_arguments(Some(json!(""))).expect("empty").is_empty());
        assert!(normalize_arguments(None).expect("absent").is_empty());
    }
}
