// ToolChat Core Library - tool-augmented chat turns for local model runners
// Three-layer architecture: Util -> Infrastructure/Service -> Agentic

pub mod agentic; // Agentic layer - request assembler, fallback tool-call extractor
pub mod infrastructure; // Infrastructure layer - model runner seam, provider clients
pub mod service; // Service layer - configuration
pub mod util; // Utility layer - errors

// Export main types
pub use toolchat_core_types as types;
pub use util::errors::*;

// Export service layer components
pub use service::config::{ConfigService, ProcessorConfig, RunnerConfig, ToolChatConfig};

// Export infrastructure components
pub use infrastructure::ai::{BoundRunner, ModelRunner, OpenAICompatRunner};

// Export Agentic core types
pub use agentic::{
    chat::ChatWithToolsProcessor,
    tool_calls::{extract_tool_calls, DecodeError},
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CORE_NAME: &str = "ToolChat Core";
