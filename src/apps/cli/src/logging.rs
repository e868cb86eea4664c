//! Logging Configuration
//!
//! Core crates log through the `log` facade; the subscriber installed here
//! bridges those records into `tracing` and writes them to stderr so stdout
//! stays reserved for JSON output.

use anyhow::{anyhow, Result};
use log::LevelFilter;
use tracing_subscriber::EnvFilter;

const LOG_LEVEL_ENV: &str = "TOOLCHAT_LOG_LEVEL";

pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

pub fn level_to_str(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Trace => "trace",
        LevelFilter::Debug => "debug",
        LevelFilter::Info => "info",
        LevelFilter::Warn => "warn",
        LevelFilter::Error => "error",
        LevelFilter::Off => "off",
    }
}

fn default_level(is_debug: bool) -> LevelFilter {
    if is_debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn resolve_level(env_value: Option<&str>, is_debug: bool) -> LevelFilter {
    match env_value {
        Some(val) => parse_log_level(val).unwrap_or_else(|| {
            eprintln!(
                "Warning: Invalid {} '{}', falling back to default",
                LOG_LEVEL_ENV, val
            );
            default_level(is_debug)
        }),
        None => default_level(is_debug),
    }
}

pub fn init_logging(is_debug: bool) -> Result<LevelFilter> {
    let env_value = std::env::var(LOG_LEVEL_ENV).ok();
    let level = resolve_level(env_value.as_deref(), is_debug);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level_to_str(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(level)
}
