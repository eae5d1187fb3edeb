//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use mirai_core::types::SessionConfig;

use super::error::{ConfigError, ConfigResult};
use crate::logging::SpanEvents;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MiraiConfig {
    /// Session settings sent to the server.
    pub session: SessionSettings,

    /// How event handlers are executed.
    pub dispatch: DispatchConfig,

    pub logging: LoggingConfig,
}

impl MiraiConfig {
    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.session.cache_size == 0 {
            return Err(ConfigError::validation("session.cache_size must be positive"));
        }
        if self.logging.output == LogOutput::File && self.logging.file_path.is_none() {
            return Err(ConfigError::validation(
                "logging.file_path is required when logging.output is \"file\"",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

/// Session settings, in config-file spelling.
///
/// Converted into the wire [`SessionConfig`] with
/// [`to_session_config`](Self::to_session_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cache_size: usize,
    pub enable_websocket: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let wire = SessionConfig::default();
        Self {
            cache_size: wire.cache_size,
            enable_websocket: wire.enable_websocket,
        }
    }
}

impl SessionSettings {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            cache_size: self.cache_size,
            enable_websocket: self.enable_websocket,
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Where event handlers run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPolicy {
    /// Handlers are awaited one after another in the dispatching task.
    #[default]
    SingleThread,
    /// Each handler is spawned onto the tokio runtime.
    ThreadPool,
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SingleThread => "single_thread",
            Self::ThreadPool => "thread_pool",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub execution: ExecutionPolicy,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line format of log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `full` without it.
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// How often the log file is rolled over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,

    /// Log file, used when `output` is `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    pub rotation: LogRotation,

    pub thread_ids: bool,
    /// Include source file and line.
    pub file_location: bool,
    pub span_events: SpanEvents,

    /// Per-target levels, e.g. `mirai_runtime = "debug"`.
    pub filters: HashMap<String, LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MiraiConfig::default();
        assert_eq!(config.session.cache_size, 4096);
        assert!(!config.session.enable_websocket);
        assert_eq!(config.dispatch.execution, ExecutionPolicy::SingleThread);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = MiraiConfig::default();
        config.session.cache_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));

        let mut config = MiraiConfig::default();
        config.logging.output = LogOutput::File;
        assert!(config.validate().is_err());
        config.logging.file_path = Some(PathBuf::from("logs/mirai.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_settings_to_wire() {
        let settings = SessionSettings {
            cache_size: 128,
            enable_websocket: true,
        };
        let wire = settings.to_session_config();
        assert_eq!(wire.cache_size, 128);
        assert!(wire.enable_websocket);
    }

    #[test]
    fn test_execution_policy_names() {
        assert_eq!(ExecutionPolicy::ThreadPool.to_string(), "thread_pool");
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    }
}
