//! Configuration for the mirai runtime.
//!
//! Settings are layered with figment: built-in defaults, then a `mirai.toml`
//! (or `mirai.yaml`) file, then `MIRAI_*` environment variables.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config, load_config_from_file};
pub use schema::{
    DispatchConfig, ExecutionPolicy, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    MiraiConfig, SessionSettings,
};
