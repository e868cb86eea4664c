//! Service layer - configuration

pub mod config;

pub use config::{ConfigService, ToolChatConfig};
