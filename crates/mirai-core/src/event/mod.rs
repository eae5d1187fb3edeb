//! Server events.
//!
//! [`Event`] is a closed variant over every notification the server pushes,
//! including the three message deliveries. Documents are selected by their
//! `"type"` field, which must name one of the kinds verbatim; anything else
//! is a decode error.
//!
//! # Example
//!
//! ```rust,ignore
//! use mirai_core::{ClosedVariant, Event, event::GroupMessage};
//!
//! let event = Event::from_json(raw)?;
//! if let Some(msg) = event.get_if::<GroupMessage>() {
//!     println!("{}: {}", msg.sender.member_name, msg.message.content);
//! }
//! ```

mod bot;
mod group;
mod member;
mod message;
mod request;

pub use bot::*;
pub use group::*;
pub use member::*;
pub use message::*;
pub use request::*;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use mirai_macros::ClosedVariant;

use crate::error::DecodeResult;
use crate::message::ReceivedMessage;
use crate::variant::{ClosedVariant as _, VariantTag, decode_tagged};

// ============================================================================
// Event Enum
// ============================================================================

/// Any event pushed by the server.
#[derive(Debug, Clone, PartialEq, Deserialize, ClosedVariant)]
#[serde(tag = "type")]
#[closed_variant(tag = "EventType", visitor = "EventVisitor", mapper = "EventMapper")]
pub enum Event {
    GroupMessage(GroupMessage),
    FriendMessage(FriendMessage),
    TempMessage(TempMessage),
    BotOnlineEvent(BotOnlineEvent),
    BotOfflineEventActive(BotOfflineEventActive),
    BotOfflineEventForce(BotOfflineEventForce),
    BotOfflineEventDropped(BotOfflineEventDropped),
    BotReloginEvent(BotReloginEvent),
    GroupRecallEvent(GroupRecallEvent),
    FriendRecallEvent(FriendRecallEvent),
    BotGroupPermissionChangeEvent(BotGroupPermissionChangeEvent),
    BotMuteEvent(BotMuteEvent),
    BotUnmuteEvent(BotUnmuteEvent),
    BotJoinGroupEvent(BotJoinGroupEvent),
    BotLeaveEventActive(BotLeaveEventActive),
    BotLeaveEventKick(BotLeaveEventKick),
    GroupNameChangeEvent(GroupNameChangeEvent),
    GroupEntranceAnnouncementChangeEvent(GroupEntranceAnnouncementChangeEvent),
    GroupMuteAllEvent(GroupMuteAllEvent),
    GroupAllowAnonymousChatEvent(GroupAllowAnonymousChatEvent),
    GroupAllowConfessTalkEvent(GroupAllowConfessTalkEvent),
    GroupAllowMemberInviteEvent(GroupAllowMemberInviteEvent),
    MemberJoinEvent(MemberJoinEvent),
    MemberLeaveEventKick(MemberLeaveEventKick),
    MemberLeaveEventQuit(MemberLeaveEventQuit),
    MemberCardChangeEvent(MemberCardChangeEvent),
    MemberSpecialTitleChangeEvent(MemberSpecialTitleChangeEvent),
    MemberPermissionChangeEvent(MemberPermissionChangeEvent),
    MemberMuteEvent(MemberMuteEvent),
    MemberUnmuteEvent(MemberUnmuteEvent),
    NewFriendRequestEvent(NewFriendRequestEvent),
    MemberJoinRequestEvent(MemberJoinRequestEvent),
}

impl Event {
    /// Decodes an event document, selecting the kind by its `"type"` field.
    pub fn decode(doc: &Value) -> DecodeResult<Self> {
        let event = decode_tagged::<Self>(doc, "type");
        if let Err(err) = &event {
            debug!(error = %err, "Failed to decode event");
        }
        event
    }

    pub fn from_json(json: &str) -> DecodeResult<Self> {
        let doc: Value = serde_json::from_str(json)?;
        Self::decode(&doc)
    }

    /// Wire name of the event kind, e.g. `"GroupMessage"`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    /// The received message, for the three message kinds.
    pub fn message(&self) -> Option<&ReceivedMessage> {
        match self {
            Self::GroupMessage(e) => Some(&e.message),
            Self::FriendMessage(e) => Some(&e.message),
            Self::TempMessage(e) => Some(&e.message),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        self.message().is_some()
    }
}
