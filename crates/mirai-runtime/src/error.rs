//! Runtime error types.

use thiserror::Error;

use mirai_core::DecodeError;

pub use crate::config::{ConfigError, ConfigResult};

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An inbound document could not be decoded into an event.
    #[error("Failed to decode event: {0}")]
    Decode(#[from] DecodeError),

    /// The dispatcher has been shut down and accepts no more events.
    #[error("Dispatcher is shut down")]
    ShutDown,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
