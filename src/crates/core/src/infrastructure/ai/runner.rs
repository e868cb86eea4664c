use crate::util::errors::ToolChatResult;
use async_trait::async_trait;
use toolchat_core_types::{Message, ResponseRecord, ToolSchema};

/// A language-model backend that can be bound to a tool schema.
///
/// Binding never mutates the runner: each call returns a fresh handle scoped to
/// one invocation, so concurrent requests cannot see each other's tools.
pub trait ModelRunner: Send + Sync {
    fn bind_tools(&self, schema: ToolSchema) -> Box<dyn BoundRunner>;
}

/// A runner bound to one tool schema for one invocation.
#[async_trait]
pub trait BoundRunner: Send + Sync {
    /// Run the model once over `messages`.
    ///
    /// Tool calls in the returned record are already in `{id, name, args}` shape.
    async fn invoke(&self, messages: &[Message]) -> ToolChatResult<ResponseRecord>;
}
