//! Mirai Runtime - configuration, logging and event dispatch for mirai bots.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `MiraiConfig`)
//! - Logging setup on top of `tracing-subscriber` (`LoggingBuilder`)
//! - Routing of decoded events to async handlers (`EventDispatcher`)
//!
//! ```ignore
//! use mirai_core::event::FriendMessage;
//! use mirai_runtime::{EventDispatcher, config::load_config, logging};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let dispatcher = EventDispatcher::from_config(&config.dispatch);
//!     dispatcher.on(|msg: FriendMessage| async move {
//!         tracing::info!(from = %msg.sender.id, "{}", msg.message.content);
//!     });
//!
//!     for raw in incoming_documents() {
//!         dispatcher.dispatch_json(&raw).await?;
//!     }
//!     dispatcher.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, ExecutionPolicy, MiraiConfig};
pub use dispatcher::EventDispatcher;
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// Provides the logging macros and `Level` for span creation.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
