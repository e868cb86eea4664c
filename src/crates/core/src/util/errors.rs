//! Error types for the ToolChat core library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolChatError {
    /// The `tools` payload could not be decoded; fatal for the invocation.
    #[error("Tool schema error: {0}")]
    ToolSchema(String),

    #[error("Decode error: {0}")]
    Decode(String),

    /// The model runner failed; fatal for the invocation.
    #[error("Model runner error: {0}")]
    Runner(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ToolChatResult<T> = Result<T, ToolChatError>;

impl ToolChatError {
    pub fn tool_schema(msg: impl Into<String>) -> Self {
        Self::ToolSchema(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn runner(msg: impl Into<String>) -> Self {
        Self::Runner(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<reqwest::Error> for ToolChatError {
    fn from(error: reqwest::Error) -> Self {
        Self::Runner(error.to_string())
    }
}

impl From<toml::de::Error> for ToolChatError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(error.to_string())
    }
}
