//! Events about the bot account itself.

use std::time::Duration;

use serde::Deserialize;

use crate::types::{Group, Member, Permission, UserId, duration_secs};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotOnlineEvent {
    pub qq: UserId,
}

/// The bot went offline on its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotOfflineEventActive {
    pub qq: UserId,
}

/// The bot was forced offline, usually by a login elsewhere.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotOfflineEventForce {
    pub qq: UserId,
}

/// The bot's connection was dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotOfflineEventDropped {
    pub qq: UserId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotReloginEvent {
    pub qq: UserId,
}

/// The bot's permission changed in a group. Only the owner can do this.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotGroupPermissionChangeEvent {
    pub origin: Permission,
    pub current: Permission,
    pub group: Group,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotMuteEvent {
    #[serde(rename = "durationSeconds", deserialize_with = "duration_secs")]
    pub duration: Duration,
    pub operator: Member,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotUnmuteEvent {
    pub operator: Member,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotJoinGroupEvent {
    pub group: Group,
}

/// The bot left a group on its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotLeaveEventActive {
    pub group: Group,
}

/// The bot was kicked out of a group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotLeaveEventKick {
    pub group: Group,
}
