//! # Mirai Core
//!
//! Client-side model of the mirai chat-bot protocol.
//!
//! ## Modules
//!
//! - **Closed variants** ([`variant`]): typed access, visitors and tag tables
//!   for enums derived with `#[derive(ClosedVariant)]`
//! - **Segments** ([`segment`]): the ten message content kinds
//! - **Messages** ([`message`]): the normalized [`Message`] chain, the
//!   escape codec and [`ReceivedMessage`]
//! - **Events** ([`event`]): every server notification as one [`Event`]
//! - **Types** ([`types`]): identifiers, contacts and configuration records
//!
//! ## Data flow
//!
//! ```text
//! JSON document ──decode──▶ Event ──▶ ReceivedMessage ──▶ Message ──stringify──▶ text
//!                                                            ▲
//!                                Segment::plain / at / … ────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use mirai_core::{Message, Segment, segment::{At, Plain}};
//!
//! let msg = Message::from_chain(vec![Segment::plain("/kick "), Segment::at(10001)]);
//! if let Some((cmd, target)) = msg.match_types::<(Plain, At)>() {
//!     assert_eq!(cmd.text, "/kick ");
//!     assert_eq!(target.target.0, 10001);
//! }
//! ```

extern crate self as mirai_core;

pub mod error;
pub mod event;
pub mod message;
pub mod segment;
pub mod types;
pub mod variant;

pub use error::{DecodeError, DecodeResult, EscapeError};
pub use event::{Event, EventType};
pub use message::{Message, MessageChain, ReceivedMessage, escape, unescape};
pub use mirai_macros::ClosedVariant;
pub use segment::{Segment, SegmentType};
pub use variant::{ClosedVariant, Payload, TypePattern, VariantTag};
