//! Events about group members other than the bot.

use std::time::Duration;

use serde::Deserialize;

use crate::types::{Member, Permission, duration_secs};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberJoinEvent {
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberLeaveEventKick {
    pub member: Member,
    /// `None` when the bot kicked the member.
    #[serde(default)]
    pub operator: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberLeaveEventQuit {
    pub member: Member,
}

/// A member's group card (nickname in the group) changed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberCardChangeEvent {
    pub origin: String,
    pub current: String,
    pub member: Member,
    #[serde(default)]
    pub operator: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberSpecialTitleChangeEvent {
    pub origin: String,
    pub current: String,
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberPermissionChangeEvent {
    pub origin: Permission,
    pub current: Permission,
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberMuteEvent {
    #[serde(rename = "durationSeconds", deserialize_with = "duration_secs")]
    pub duration: Duration,
    pub member: Member,
    #[serde(default)]
    pub operator: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberUnmuteEvent {
    pub member: Member,
    #[serde(default)]
    pub operator: Option<Member>,
}
