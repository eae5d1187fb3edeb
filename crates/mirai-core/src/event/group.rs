//! Group setting changes. `operator` is `None` when the bot made the change.

use serde::Deserialize;

use crate::types::{Group, Member};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupNameChangeEvent {
    pub origin: String,
    pub current: String,
    pub group: Group,
    #[serde(default)]
    pub operator: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupEntranceAnnouncementChangeEvent {
    pub origin: String,
    pub current: String,
    pub group: Group,
    #[serde(default)]
    pub operator: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupMuteAllEvent {
    pub origin: bool,
    pub current: bool,
    pub group: Group,
    #[serde(default)]
    pub operator: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupAllowAnonymousChatEvent {
    pub origin: bool,
    pub current: bool,
    pub group: Group,
    #[serde(default)]
    pub operator: Option<Member>,
}

/// Reported with an `is_by_bot` flag rather than an operator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAllowConfessTalkEvent {
    pub origin: bool,
    pub current: bool,
    pub group: Group,
    #[serde(default)]
    pub is_by_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupAllowMemberInviteEvent {
    pub origin: bool,
    pub current: bool,
    pub group: Group,
    #[serde(default)]
    pub operator: Option<Member>,
}
