//! Message delivery and recall events.

use serde::Deserialize;

use crate::message::ReceivedMessage;
use crate::types::{Friend, Group, Member, MessageId, UserId};

/// A message posted in a group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupMessage {
    #[serde(rename = "messageChain")]
    pub message: ReceivedMessage,
    pub sender: Member,
}

/// A private message from a friend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FriendMessage {
    #[serde(rename = "messageChain")]
    pub message: ReceivedMessage,
    pub sender: Friend,
}

/// A temporary private message from a group member who is not a friend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TempMessage {
    #[serde(rename = "messageChain")]
    pub message: ReceivedMessage,
    pub sender: Member,
}

/// A group message was recalled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecallEvent {
    /// Sender of the recalled message.
    pub author_id: UserId,
    pub message_id: MessageId,
    /// When the recalled message was sent.
    #[serde(default)]
    pub time: i32,
    pub group: Group,
    /// `None` when the bot recalled it.
    #[serde(default)]
    pub operator: Option<Member>,
}

/// A friend message was recalled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRecallEvent {
    pub author_id: UserId,
    pub message_id: MessageId,
    #[serde(default)]
    pub time: i32,
    pub operator: UserId,
}
