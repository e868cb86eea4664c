use serde::{Deserialize, Serialize};

/// Correlation id given to every tool-result message in compatibility mode.
pub const COMPAT_TOOL_CALL_ID: &str = "42";

/// Where reconstructed history messages take their content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryContentMode {
    /// Compatibility mode: every history message carries the current system
    /// prompt, not the entry's stored content. Matches the deployed behavior.
    #[default]
    SystemPrompt,
    /// Each history message carries its own stored content.
    Entry,
}

/// Which correlation id tool-result messages carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolResultIdMode {
    /// Compatibility mode: always [`COMPAT_TOOL_CALL_ID`].
    #[default]
    Fixed,
    /// The entry's own id, falling back to [`COMPAT_TOOL_CALL_ID`] when absent.
    Entry,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_model() -> String {
    "local".to_string()
}

fn default_request_timeout_secs() -> u64 {
    600
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Server root, with or without a trailing `/v1`
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub history_content: HistoryContentMode,
    pub tool_result_id: ToolResultIdMode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolChatConfig {
    pub runner: RunnerConfig,
    pub processor: ProcessorConfig,
}
