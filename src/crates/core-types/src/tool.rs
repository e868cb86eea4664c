use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool definitions offered to the model for a single invocation, in order.
pub type ToolSchema = Vec<ToolDefinition>;

fn empty_parameters() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// A callable tool the model may ask for.
///
/// Decodes from either the bare `{name, description, parameters}` shape or the
/// OpenAI `{"type": "function", "function": {...}}` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawToolDefinition")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object
    pub parameters: Value,
}

#[derive(Deserialize)]
struct ToolFunctionFields {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "empty_parameters")]
    parameters: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToolDefinition {
    Wrapped { function: ToolFunctionFields },
    Bare(ToolFunctionFields),
}

impl From<RawToolDefinition> for ToolDefinition {
    fn from(raw: RawToolDefinition) -> Self {
        let fields = match raw {
            RawToolDefinition::Wrapped { function } => function,
            RawToolDefinition::Bare(fields) => fields,
        };
        Self {
            name: fields.name,
            description: fields.description,
            parameters: fields.parameters,
        }
    }
}

/// A tool invocation requested by the model. Identical shape whether the
/// runner produced it natively or it was recovered from free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::{ToolCall, ToolDefinition, ToolSchema};
    use serde_json::json;

    #[test]
    fn decodes_bare_and_wrapped_tool_definitions() {
        let raw = r#"[
            {"name": "get_weather", "description": "Weather by city",
             "parameters": {"type": "object", "properties": {"city": {"type": "string"}}}},
            {"type": "function", "function": {"name": "get_time"}}
        ]"#;

        let schema: ToolSchema = serde_json::from_str(raw).expect("valid tool schema");

        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].name, "get_weather");
        assert_eq!(
            schema[0].parameters["properties"]["city"]["type"],
            json!("string")
        );
        assert_eq!(schema[1].name, "get_time");
        assert_eq!(schema[1].description, "");
        assert_eq!(schema[1].parameters["type"], json!("object"));
    }

    #[test]
    fn rejects_tool_definition_without_name() {
        let result = serde_json::from_str::<ToolDefinition>(r#"{"description": "nameless"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn tool_call_serializes_id_name_args_in_order() {
        let call = ToolCall {
            id: "7".to_string(),
            name: "get_weather".to_string(),
            args: json!({ "city": "Rome" }).as_object().cloned().unwrap_or_default(),
        };

        let encoded = serde_json::to_string(&call).expect("serialize tool call");
        assert_eq!(
            encoded,
            r#"{"id":"7","name":"get_weather","args":{"city":"Rome"}}"#
        );
    }
}
