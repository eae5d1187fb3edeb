//! Requests awaiting an answer from the bot.
//!
//! The `event_id` must be echoed back together with a
//! [`NewFriendResponse`](crate::types::NewFriendResponse) or
//! [`MemberJoinResponse`](crate::types::MemberJoinResponse) code.

use serde::Deserialize;

use crate::types::{GroupId, UserId, optional_group};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFriendRequestEvent {
    pub event_id: i64,
    pub from_id: UserId,
    /// Set when the request was started from a group.
    #[serde(default, deserialize_with = "optional_group")]
    pub group_id: Option<GroupId>,
    /// Nickname, or group card when sent from a group.
    pub nick: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberJoinRequestEvent {
    pub event_id: i64,
    pub from_id: UserId,
    pub group_id: GroupId,
    pub group_name: String,
    pub nick: String,
}
