//! Shared low-level DTOs for ToolChat.
//!
//! These types cross crate boundaries (core library, CLI) and the wire, so they
//! carry serde derives and nothing else.

pub mod message;
pub mod request;
pub mod tool;

pub use message::{Message, MessageRole, ResponseRecord};
pub use request::{EncodedRecord, ProcessOutput, RequestBundle};
pub use tool::{ToolCall, ToolDefinition, ToolSchema};
