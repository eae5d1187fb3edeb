//! # Mirai
//!
//! A typed client model for the mirai chat-bot protocol, with a small
//! runtime for configuration, logging and event dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────────────────┐
//! │ JSON document│────▶│ Event::decode │────▶│ EventDispatcher          │──▶ handlers
//! └──────────────┘     └───────────────┘     │ (single thread / pool)   │
//!                                            └──────────────────────────┘
//! ```
//!
//! - **Core**: segments, messages, events and the closed-variant engine
//! - **Runtime**: layered config, logging, handler dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mirai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     init_from_config(&config.logging);
//!
//!     let dispatcher = EventDispatcher::from_config(&config.dispatch);
//!     dispatcher.on(|msg: GroupMessage| async move {
//!         if msg.message.content.starts_with("/ping") {
//!             info!(group = %msg.sender.group.id, "pong");
//!         }
//!     });
//!
//!     dispatcher.dispatch_json(raw_event).await?;
//!     dispatcher.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: `mirai.toml` config files (default)
//! - `yaml-config`: `mirai.yaml` config files
//! - `json-log`: JSON log output

pub use mirai_core as core;
pub use mirai_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use mirai::prelude::*;
/// ```
pub mod prelude {
    // Closed variants
    pub use mirai_core::{ClosedVariant, Payload, VariantTag};

    // Messages
    pub use mirai_core::segment::{
        App, At, AtAll, Face, FlashImage, Image, Json, Plain, Poke, SegmentMapper, SegmentVisitor,
        Xml,
    };
    pub use mirai_core::{Message, MessageChain, ReceivedMessage, Segment, SegmentType};

    // Events
    pub use mirai_core::event::{EventMapper, EventVisitor, FriendMessage, GroupMessage, TempMessage};
    pub use mirai_core::{Event, EventType};

    // Identifiers
    pub use mirai_core::types::{GroupId, MessageId, UserId};

    // Runtime
    pub use mirai_runtime::config::load_config;
    pub use mirai_runtime::logging::init_from_config;
    pub use mirai_runtime::{EventDispatcher, ExecutionPolicy, MiraiConfig};

    // Logging macros
    pub use mirai_runtime::prelude::*;
}
