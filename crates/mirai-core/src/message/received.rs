//! Inbound messages with their source and quote metadata.
//!
//! On the wire a received chain carries its metadata as leading pseudo
//! segments: a `Source` first, then an optional `Quote`, then the content.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::chain::Message;
use crate::error::{DecodeError, DecodeResult};
use crate::segment::Segment;
use crate::types::{GroupId, MessageId, UserId};

/// Where a received message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: MessageId,
    /// Unix timestamp in seconds.
    pub time: i32,
}

/// Reference to the message being replied to.
///
/// Two quotes are equal when they point at the same message; the quoted
/// content is not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: MessageId,
    /// `0` when the quoted message was not sent in a group.
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub origin: Message,
}

impl PartialEq for Quote {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.group_id == other.group_id && self.sender_id == other.sender_id
    }
}

/// A message as delivered by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedMessage {
    pub source: Source,
    pub quote: Option<Quote>,
    pub content: Message,
}

impl ReceivedMessage {
    /// Decodes a wire chain: `Source`, optional `Quote`, then content.
    pub fn decode(doc: &Value) -> DecodeResult<Self> {
        let items = Vec::<Value>::deserialize(doc)?;
        Self::from_items(&items)
    }

    pub fn from_json(json: &str) -> DecodeResult<Self> {
        let doc: Value = serde_json::from_str(json)?;
        Self::decode(&doc)
    }

    fn from_items(items: &[Value]) -> DecodeResult<Self> {
        let (first, rest) = match items.split_first() {
            Some((first, rest)) if kind_of(first) == Some("Source") => (first, rest),
            _ => return Err(DecodeError::MissingSource),
        };
        let source = Source::deserialize(first).map_err(|source| DecodeError::Malformed {
            kind: "Source",
            source,
        })?;

        let (quote, rest) = match rest.split_first() {
            Some((quote, tail)) if kind_of(quote) == Some("Quote") => {
                let quote = Quote::deserialize(quote).map_err(|source| DecodeError::Malformed {
                    kind: "Quote",
                    source,
                })?;
                (Some(quote), tail)
            }
            _ => (None, rest),
        };

        let content = rest.iter().map(Segment::decode).collect::<DecodeResult<Message>>()?;

        Ok(Self {
            source,
            quote,
            content,
        })
    }

    #[inline]
    pub fn id(&self) -> MessageId {
        self.source.id
    }

    #[inline]
    pub fn time(&self) -> i32 {
        self.source.time
    }

    pub fn is_reply(&self) -> bool {
        self.quote.is_some()
    }
}

fn kind_of(doc: &Value) -> Option<&str> {
    doc.get("type").and_then(Value::as_str)
}

impl From<ReceivedMessage> for Message {
    fn from(received: ReceivedMessage) -> Self {
        received.content
    }
}

impl<'de> Deserialize<'de> for ReceivedMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;
        Self::from_items(&items).map_err(serde::de::Error::custom)
    }
}

/// A metadata record written with its `"type"` discriminator.
#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for ReceivedMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.quote.is_some()) + self.content.len();
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&Tagged {
            kind: "Source",
            inner: &self.source,
        })?;
        if let Some(quote) = &self.quote {
            seq.serialize_element(&Tagged {
                kind: "Quote",
                inner: quote,
            })?;
        }
        for segment in &self.content {
            seq.serialize_element(segment)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_chain() -> Value {
        json!([
            { "type": "Source", "id": 1001, "time": 1600000000 },
            {
                "type": "Quote",
                "id": 998,
                "groupId": 42,
                "senderId": 10001,
                "targetId": 42,
                "origin": [{ "type": "Plain", "text": "earlier" }]
            },
            { "type": "At", "target": 10001, "display": "@alice" },
            { "type": "Plain", "text": " agreed" }
        ])
    }

    #[test]
    fn test_decode_with_quote() {
        let msg = ReceivedMessage::decode(&sample_chain()).unwrap();
        assert_eq!(msg.id(), MessageId(1001));
        assert_eq!(msg.time(), 1600000000);
        assert!(msg.is_reply());

        let quote = msg.quote.as_ref().unwrap();
        assert_eq!(quote.sender_id, UserId(10001));
        assert_eq!(quote.origin, "earlier");
        assert_eq!(
            msg.content.chain(),
            &[Segment::at(10001), Segment::plain(" agreed")]
        );
    }

    #[test]
    fn test_decode_without_quote() {
        let msg = ReceivedMessage::from_json(
            r#"[{"type":"Source","id":7,"time":1},{"type":"Plain","text":"hi"}]"#,
        )
        .unwrap();
        assert!(msg.quote.is_none());
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn test_decode_requires_source() {
        let err = ReceivedMessage::decode(&json!([{ "type": "Plain", "text": "hi" }])).unwrap_err();
        assert!(matches!(err, DecodeError::MissingSource));

        let err = ReceivedMessage::decode(&json!([])).unwrap_err();
        assert!(matches!(err, DecodeError::MissingSource));

        let err = ReceivedMessage::decode(&json!([{ "type": "Source", "id": "x", "time": 0 }]))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { kind: "Source", .. }));
    }

    #[test]
    fn test_quote_equality_ignores_origin() {
        let a = Quote {
            id: MessageId(1),
            group_id: GroupId(2),
            sender_id: UserId(3),
            origin: Message::from("one"),
        };
        let b = Quote {
            origin: Message::from("two"),
            ..a.clone()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_round_trip() {
        let msg = ReceivedMessage::decode(&sample_chain()).unwrap();
        let doc = serde_json::to_value(&msg).unwrap();
        assert_eq!(doc[0], json!({ "type": "Source", "id": 1001, "time": 1600000000 }));
        assert_eq!(doc[1]["type"], "Quote");

        let back: ReceivedMessage = serde_json::from_value(doc).unwrap();
        assert_eq!(back, msg);
    }
}
