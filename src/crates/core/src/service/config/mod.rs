//! Configuration loading
//!
//! A single TOML file with `[runner]` and `[processor]` tables. Every field is
//! optional; missing values fall back to compatibility-preserving defaults.

mod types;

pub use types::{
    HistoryContentMode, ProcessorConfig, RunnerConfig, ToolChatConfig, ToolResultIdMode,
    COMPAT_TOOL_CALL_ID,
};

use crate::util::errors::{ToolChatError, ToolChatResult};
use log::debug;
use std::path::{Path, PathBuf};

pub struct ConfigService;

impl ConfigService {
    /// `<config dir>/toolchat/config.toml`, when the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("toolchat").join("config.toml"))
    }

    pub fn parse_str(raw: &str) -> ToolChatResult<ToolChatConfig> {
        Ok(toml::from_str(raw)?)
    }

    /// Load an explicit config file, or the default one if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> ToolChatResult<ToolChatConfig> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(ToolChatConfig::default());
                }
            },
        };

        let raw = std::fs::read_to_string(&path).map_err(|e| {
            ToolChatError::config(format!(
                "Failed to read config file: path={}, error={}",
                path.display(),
                e
            ))
        })?;
        debug!("Loading config: path={}", path.display());
        toml::from_str(&raw).map_err(|e| {
            ToolChatError::config(format!(
                "Invalid config file: path={}, error={}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigService, HistoryContentMode, ToolChatConfig, ToolResultIdMode};
    use std::path::Path;

    #[test]
    fn empty_file_yields_compatibility_defaults() {
        let config = ConfigService::parse_str("").expect("empty config");
        assert_eq!(config, ToolChatConfig::default());
        assert_eq!(config.processor.history_content, HistoryContentMode::SystemPrompt);
        assert_eq!(config.processor.tool_result_id, ToolResultIdMode::Fixed);
        assert_eq!(config.runner.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.runner.request_timeout_secs, 600);
    }

    #[test]
    fn parses_partial_tables() {
        let config = ConfigService::parse_str(
            r#"
            [runner]
            model = "qwen2.5-7b-instruct"
            temperature = 0.2

            [processor]
            history_content = "entry"
            tool_result_id = "entry"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.runner.model, "qwen2.5-7b-instruct");
        assert_eq!(config.runner.temperature, Some(0.2));
        assert_eq!(config.runner.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.processor.history_content, HistoryContentMode::Entry);
        assert_eq!(config.processor.tool_result_id, ToolResultIdMode::Entry);
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = ConfigService::parse_str("[processor]\nhistory_content = \"latest\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_missing_file_is_a_config_error() {
        let err = ConfigService::load(Some(Path::new("/nonexistent/toolchat.toml")))
            .expect_err("missing file");
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn invalid_file_error_names_path_once_prefixed() {
        let path = std::env::temp_dir().join(format!(
            "toolchat-invalid-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[runner\nmodel = 1\n").expect("write temp config");

        let err = ConfigService::load(Some(&path)).expect_err("invalid toml");
        let _ = std::fs::remove_file(&path);

        let message = err.to_string();
        assert_eq!(message.matches("Configuration error").count(), 1);
        assert!(message.contains("Invalid config file"));
    }
}
