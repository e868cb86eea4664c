//! Agentic layer - request assembly and tool-call recovery

pub mod chat;
pub mod tool_calls;

pub use chat::ChatWithToolsProcessor;
pub use tool_calls::{extract_tool_calls, DecodeError};
