//! Wire types shared by segments and events: identifiers, contacts and the
//! small configuration records exchanged with the server.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A user (QQ) number.
    UserId(i64)
);
id_type!(
    /// A group number.
    GroupId(i64)
);
id_type!(
    /// A message id, unique within the server session.
    MessageId(i32)
);

// Unsuffixed integer literals fall back to `i32`.
impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

impl From<i32> for GroupId {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

// ============================================================================
// Contacts
// ============================================================================

/// Permission of a member within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    #[default]
    Member,
    Administrator,
    Owner,
}

/// Kind of conversation a message is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Friend,
    Group,
    Temp,
}

/// A group as seen by the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// The bot's own permission in this group.
    pub permission: Permission,
}

/// A member of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: UserId,
    pub member_name: String,
    pub permission: Permission,
    pub group: Group,
}

/// A friend of the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: UserId,
    pub nickname: String,
    pub remark: String,
}

// ============================================================================
// Configuration records
// ============================================================================

/// Group settings. Unset fields are left untouched when sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confess_talk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_member_invite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_chat: Option<bool>,
}

/// Editable information of a group member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_title: Option<String>,
}

/// Per-session settings negotiated with the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Number of messages the server keeps for quoting and recall.
    pub cache_size: usize,
    pub enable_websocket: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_size: 4096,
            enable_websocket: false,
        }
    }
}

// ============================================================================
// Request responses
// ============================================================================

/// Answer to a [`NewFriendRequestEvent`](crate::event::NewFriendRequestEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewFriendResponse {
    Approve,
    Disapprove,
    /// Refuse and block further requests from the user.
    Blacklist,
}

impl NewFriendResponse {
    /// Operate code sent to the server.
    pub fn code(self) -> i32 {
        match self {
            Self::Approve => 0,
            Self::Disapprove => 1,
            Self::Blacklist => 2,
        }
    }
}

/// Answer to a [`MemberJoinRequestEvent`](crate::event::MemberJoinRequestEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberJoinResponse {
    Approve,
    Disapprove,
    Ignore,
    DisapproveBlacklist,
    IgnoreBlacklist,
}

impl MemberJoinResponse {
    /// Operate code sent to the server.
    pub fn code(self) -> i32 {
        match self {
            Self::Approve => 0,
            Self::Disapprove => 1,
            Self::Ignore => 2,
            Self::DisapproveBlacklist => 3,
            Self::IgnoreBlacklist => 4,
        }
    }
}

// ============================================================================
// Serde helpers
// ============================================================================

/// Reads a whole number of seconds into a [`Duration`].
pub(crate) fn duration_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

/// Reads a group id where `0` means "no group".
pub(crate) fn optional_group<'de, D>(deserializer: D) -> Result<Option<GroupId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<i64>::deserialize(deserializer)?;
    Ok(id.filter(|id| *id != 0).map(GroupId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_from_json() {
        let member: Member = serde_json::from_value(json!({
            "id": 1234567890,
            "memberName": "alice",
            "permission": "ADMINISTRATOR",
            "group": { "id": 42, "name": "rustaceans", "permission": "MEMBER" }
        }))
        .unwrap();

        assert_eq!(member.id, UserId(1234567890));
        assert_eq!(member.permission, Permission::Administrator);
        assert_eq!(member.group.id, GroupId(42));
        assert_eq!(member.group.permission, Permission::Member);
    }

    #[test]
    fn test_session_config_defaults() {
        let config: SessionConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.cache_size, 4096);
        assert!(!config.enable_websocket);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({ "cacheSize": 4096, "enableWebsocket": false }));
    }

    #[test]
    fn test_group_config_skips_unset() {
        let config = GroupConfig {
            name: Some("new name".into()),
            confess_talk: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({ "name": "new name", "confessTalk": true }));
    }

    #[test]
    fn test_response_codes() {
        assert_eq!(NewFriendResponse::Blacklist.code(), 2);
        assert_eq!(MemberJoinResponse::Approve.code(), 0);
        assert_eq!(MemberJoinResponse::IgnoreBlacklist.code(), 4);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UserId(10001).to_string(), "10001");
        assert_eq!(i64::from(GroupId(7)), 7);
    }
}
