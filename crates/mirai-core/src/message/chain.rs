//! The message engine: a normalized chain of segments and its operations.
//!
//! A [`Message`] never holds two adjacent plain-text segments. Every way of
//! installing or appending content merges neighbouring text, so equality,
//! pattern matching and stringification all see one canonical chain.
//!
//! # Example
//!
//! ```rust,ignore
//! use mirai_core::{Message, Segment};
//!
//! let mut msg = Message::from("Hello, ");
//! msg += Segment::at(10001);
//! msg += " and welcome";
//! assert_eq!(msg.len(), 3);
//! assert_eq!(msg.stringify(), "Hello, {at:10001} and welcome");
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Deref};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeResult;
use crate::segment::Segment;
use crate::variant::{TypePattern, match_types};

/// Ordered sequence of segments forming one message body.
pub type MessageChain = Vec<Segment>;

/// Merges adjacent plain-text segments in place. Idempotent.
pub fn normalize(chain: &mut MessageChain) {
    if !chain.windows(2).any(|w| w[0].is_plain() && w[1].is_plain()) {
        return;
    }
    let mut merged = Vec::with_capacity(chain.len());
    for segment in chain.drain(..) {
        push_merged(&mut merged, segment);
    }
    *chain = merged;
}

/// Pushes `segment`, folding it into the tail when both are plain text.
fn push_merged(chain: &mut MessageChain, segment: Segment) {
    if let Segment::Plain(next) = &segment {
        if let Some(Segment::Plain(last)) = chain.last_mut() {
            last.text.push_str(&next.text);
            return;
        }
    }
    chain.push(segment);
}

// ============================================================================
// Message
// ============================================================================

/// A message body that keeps its chain normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MessageChain", into = "MessageChain")]
pub struct Message {
    chain: MessageChain,
}

impl Message {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a message from a chain, merging adjacent text.
    pub fn from_chain(mut chain: MessageChain) -> Self {
        normalize(&mut chain);
        Self { chain }
    }

    // ------------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------------

    pub fn set_chain(&mut self, chain: MessageChain) {
        *self = Self::from_chain(chain);
    }

    pub fn set_segment(&mut self, segment: Segment) {
        self.chain.clear();
        self.chain.push(segment);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_segment(Segment::plain(text));
    }

    // ------------------------------------------------------------------------
    // Append
    // ------------------------------------------------------------------------

    /// Appends a segment, merging it into a trailing plain-text segment.
    pub fn push(&mut self, segment: Segment) {
        push_merged(&mut self.chain, segment);
    }

    /// Extends the trailing plain-text segment, or starts a new one.
    pub fn push_str(&mut self, text: &str) {
        match self.chain.last_mut() {
            Some(Segment::Plain(last)) => last.text.push_str(text),
            _ => self.chain.push(Segment::plain(text)),
        }
    }

    /// Appends every segment of `segments`, keeping the chain normalized.
    pub fn append(&mut self, segments: impl IntoIterator<Item = Segment>) {
        for segment in segments {
            push_merged(&mut self.chain, segment);
        }
    }

    pub fn extend_from(&mut self, other: &Message) {
        self.append(other.chain.iter().cloned());
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    #[inline]
    pub fn chain(&self) -> &[Segment] {
        &self.chain
    }

    pub fn into_chain(self) -> MessageChain {
        self.chain
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Concatenates the text of every plain-text segment.
    pub fn extract_text(&self) -> String {
        let mut text = String::new();
        for segment in &self.chain {
            if let Some(plain) = segment.as_plain() {
                text.push_str(plain);
            }
        }
        text
    }

    /// Canonical textual form: each segment's stringified form, in order.
    pub fn stringify(&self) -> String {
        self.chain.iter().map(Segment::stringify).collect()
    }

    /// Whether the first segment is plain text starting with `text`.
    pub fn starts_with(&self, text: &str) -> bool {
        self.chain
            .first()
            .and_then(Segment::as_plain)
            .is_some_and(|plain| plain.starts_with(text))
    }

    /// Whether the last segment is plain text ending with `text`.
    pub fn ends_with(&self, text: &str) -> bool {
        self.chain
            .last()
            .and_then(Segment::as_plain)
            .is_some_and(|plain| plain.ends_with(text))
    }

    /// Whether any plain-text segment contains `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.chain
            .iter()
            .filter_map(Segment::as_plain)
            .any(|plain| plain.contains(text))
    }

    /// Like [`starts_with`](Self::starts_with) for plain text, otherwise
    /// compares the first segment for equality.
    pub fn starts_with_segment(&self, segment: &Segment) -> bool {
        match segment.as_plain() {
            Some(text) => self.starts_with(text),
            None => self.chain.first() == Some(segment),
        }
    }

    pub fn ends_with_segment(&self, segment: &Segment) -> bool {
        match segment.as_plain() {
            Some(text) => self.ends_with(text),
            None => self.chain.last() == Some(segment),
        }
    }

    pub fn contains_segment(&self, segment: &Segment) -> bool {
        match segment.as_plain() {
            Some(text) => self.contains(text),
            None => self.chain.contains(segment),
        }
    }

    /// Position-exact match of the whole chain against a tuple of kinds.
    ///
    /// ```rust,ignore
    /// if let Some((cmd, target)) = msg.match_types::<(Plain, At)>() {
    ///     println!("{} {}", cmd.text, target.target);
    /// }
    /// ```
    pub fn match_types<P: TypePattern<Segment>>(&self) -> Option<P::Output<'_>> {
        match_types::<Segment, P>(&self.chain)
    }

    // ------------------------------------------------------------------------
    // Wire format
    // ------------------------------------------------------------------------

    /// Decodes a JSON array of segment documents.
    pub fn decode(doc: &Value) -> DecodeResult<Self> {
        let items = Vec::<Value>::deserialize(doc)?;
        items.iter().map(Segment::decode).collect()
    }

    pub fn from_json(json: &str) -> DecodeResult<Self> {
        let doc: Value = serde_json::from_str(json)?;
        Self::decode(&doc)
    }

    pub fn encode(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.chain)
    }
}

impl Deref for Message {
    type Target = [Segment];

    fn deref(&self) -> &[Segment] {
        &self.chain
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.chain {
            f.write_str(&segment.stringify())?;
        }
        Ok(())
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<MessageChain> for Message {
    fn from(chain: MessageChain) -> Self {
        Self::from_chain(chain)
    }
}

impl From<Message> for MessageChain {
    fn from(message: Message) -> Self {
        message.chain
    }
}

impl From<Segment> for Message {
    fn from(segment: Segment) -> Self {
        Self {
            chain: vec![segment],
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::from(Segment::plain(text))
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::from(Segment::plain(text))
    }
}

impl FromIterator<Segment> for Message {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut message = Self::new();
        message.append(iter);
        message
    }
}

impl Extend<Segment> for Message {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.append(iter);
    }
}

impl IntoIterator for Message {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.chain.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.chain.iter()
    }
}

// ============================================================================
// Operators
// ============================================================================

impl AddAssign<Segment> for Message {
    fn add_assign(&mut self, segment: Segment) {
        self.push(segment);
    }
}

impl AddAssign<&str> for Message {
    fn add_assign(&mut self, text: &str) {
        self.push_str(text);
    }
}

impl AddAssign<String> for Message {
    fn add_assign(&mut self, text: String) {
        self.push_str(&text);
    }
}

impl AddAssign<MessageChain> for Message {
    fn add_assign(&mut self, chain: MessageChain) {
        self.append(chain);
    }
}

impl AddAssign<Message> for Message {
    fn add_assign(&mut self, other: Message) {
        self.append(other.chain);
    }
}

impl AddAssign<&Message> for Message {
    fn add_assign(&mut self, other: &Message) {
        self.extend_from(other);
    }
}

impl<T> Add<T> for Message
where
    Message: AddAssign<T>,
{
    type Output = Message;

    fn add(mut self, rhs: T) -> Message {
        self += rhs;
        self
    }
}

// ============================================================================
// Text equality
// ============================================================================

impl PartialEq<str> for Message {
    fn eq(&self, other: &str) -> bool {
        match self.chain.as_slice() {
            [only] => only.as_plain() == Some(other),
            _ => false,
        }
    }
}

impl PartialEq<&str> for Message {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Message {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<Message> for str {
    fn eq(&self, other: &Message) -> bool {
        other == self
    }
}

impl PartialEq<Message> for &str {
    fn eq(&self, other: &Message) -> bool {
        other == *self
    }
}

impl PartialEq<Message> for String {
    fn eq(&self, other: &Message) -> bool {
        other == self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::segment::{At, AtAll, Face, Plain};
    use crate::variant::ClosedVariant;
    use serde_json::json;

    #[test]
    fn test_from_chain_merges_text() {
        let msg = Message::from_chain(vec![Segment::plain("x"), Segment::plain("y")]);
        assert_eq!(msg.chain(), &[Segment::plain("xy")]);

        let msg = Message::from(vec![
            Segment::plain("a"),
            Segment::plain("b"),
            Segment::at(1),
            Segment::plain("c"),
            Segment::plain("d"),
            Segment::plain("e"),
        ]);
        assert_eq!(
            msg.chain(),
            &[Segment::plain("ab"), Segment::at(1), Segment::plain("cde")]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut chain = vec![
            Segment::plain("a"),
            Segment::plain("b"),
            Segment::face_id(1),
            Segment::plain("c"),
        ];
        normalize(&mut chain);
        let once = chain.clone();
        normalize(&mut chain);
        assert_eq!(chain, once);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_append_text_merges() {
        let mut msg = Message::from("a");
        msg += Message::from("b");
        assert_eq!(msg.chain(), &[Segment::plain("ab")]);

        msg += "c";
        msg += String::from("d");
        msg += Segment::plain("e");
        assert_eq!(msg.len(), 1);
        assert_eq!(msg, "abcde");
    }

    #[test]
    fn test_append_mixed() {
        let mut msg = Message::new();
        msg += "hello ";
        msg += Segment::at(42);
        msg += " bye";
        assert_eq!(msg.len(), 3);

        let tail = Message::from_chain(vec![Segment::plain("!"), Segment::at_all()]);
        msg += &tail;
        assert_eq!(
            msg.chain(),
            &[
                Segment::plain("hello "),
                Segment::at(42),
                Segment::plain(" bye!"),
                Segment::at_all(),
            ]
        );

        msg += vec![Segment::plain("x"), Segment::plain("y")];
        assert_eq!(msg.last(), Some(&Segment::plain("xy")));

        let msg = Message::from(Segment::face_id(1)) + "a" + Segment::plain("b");
        assert_eq!(msg.chain(), &[Segment::face_id(1), Segment::plain("ab")]);
    }

    #[test]
    fn test_assignment() {
        let mut msg = Message::from("old");
        msg.set_chain(vec![Segment::plain("p"), Segment::plain("q")]);
        assert_eq!(msg, "pq");
        msg.set_segment(Segment::at_all());
        assert_eq!(msg.chain(), &[Segment::at_all()]);
        msg.set_text("new");
        assert_eq!(msg, "new");
    }

    #[test]
    fn test_string_equality() {
        assert_eq!(Message::from("hi"), "hi");
        assert_eq!("hi", Message::from("hi"));
        assert_eq!(String::from("hi"), Message::from("hi"));
        assert_ne!(Message::from("hi"), "ho");
        assert_ne!(Message::new(), "");

        let msg = Message::from_chain(vec![Segment::plain("hi"), Segment::at(1)]);
        assert_ne!(msg, "hi");
        assert_ne!(Message::from(Segment::at(1)), "{at:1}");
    }

    #[test]
    fn test_structural_equality() {
        let a = Message::from_chain(vec![Segment::plain("x"), Segment::plain("y")]);
        let b = Message::from("xy");
        assert_eq!(a, b);

        let c = Message::from_chain(vec![Segment::plain("xy"), Segment::at(1)]);
        let d = Message::from_chain(vec![Segment::plain("xy"), Segment::at(2)]);
        assert_ne!(c, d);
        assert_eq!(c.extract_text(), d.extract_text());
    }

    #[test]
    fn test_extract_text_and_stringify() {
        let msg = Message::from_chain(vec![Segment::plain("a{b}c"), Segment::at(42)]);
        assert_eq!(msg.stringify(), "a[[b]]c{at:42}");
        assert_eq!(msg.to_string(), "a[[b]]c{at:42}");
        assert_eq!(msg.extract_text(), "a{b}c");

        let msg = Message::from_chain(vec![
            Segment::plain("x"),
            Segment::face_id(1),
            Segment::plain("y"),
        ]);
        assert_eq!(msg.extract_text(), "xy");
        assert_eq!(Message::new().stringify(), "");
    }

    #[test]
    fn test_text_predicates() {
        let msg = Message::from_chain(vec![
            Segment::plain("/echo hi"),
            Segment::at(1),
            Segment::plain("tail text"),
        ]);
        assert!(msg.starts_with("/echo"));
        assert!(!msg.starts_with("tail"));
        assert!(msg.ends_with("text"));
        assert!(!msg.ends_with("hi"));
        assert!(msg.contains("il te"));
        assert!(!msg.contains("{at:1}"));

        let msg = Message::from_chain(vec![Segment::at(1), Segment::plain("x")]);
        assert!(!msg.starts_with(""));
        assert!(msg.ends_with("x"));
        assert!(!Message::new().contains(""));
    }

    #[test]
    fn test_segment_predicates() {
        let msg = Message::from_chain(vec![
            Segment::at(1),
            Segment::plain("hello world"),
            Segment::face_id(5),
        ]);
        assert!(msg.starts_with_segment(&Segment::at(1)));
        assert!(!msg.starts_with_segment(&Segment::at(2)));
        assert!(msg.ends_with_segment(&Segment::face_id(5)));
        assert!(msg.contains_segment(&Segment::plain("lo wo")));
        assert!(msg.contains_segment(&Segment::face_id(5)));
        assert!(!msg.contains_segment(&Segment::at_all()));
        assert!(!msg.starts_with_segment(&Segment::plain("hello")));
    }

    #[test]
    fn test_match_types() {
        let msg = Message::from_chain(vec![Segment::plain("hi"), Segment::at(123)]);

        let (plain, at) = msg.match_types::<(Plain, At)>().unwrap();
        assert_eq!(plain, &Plain::new("hi"));
        assert_eq!(at, &At::new(123));
        assert!(std::ptr::eq(plain, msg[0].get_if::<Plain>().unwrap()));

        assert!(msg.match_types::<(At, Plain)>().is_none());
        assert!(msg.match_types::<(Plain,)>().is_none());
        assert!(msg.match_types::<(Plain, At, AtAll)>().is_none());

        let single = Message::from("hi");
        assert!(single.match_types::<(Plain, At)>().is_none());
        assert!(single.match_types::<(Face,)>().is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let doc = json!([
            { "type": "Plain", "text": "a" },
            { "type": "Plain", "text": "b" },
            { "type": "AtAll" }
        ]);
        let msg = Message::decode(&doc).unwrap();
        assert_eq!(msg.chain(), &[Segment::plain("ab"), Segment::at_all()]);

        let via_serde: Message = serde_json::from_value(doc).unwrap();
        assert_eq!(via_serde, msg);

        assert_eq!(
            msg.encode().unwrap(),
            json!([{ "type": "Plain", "text": "ab" }, { "type": "AtAll" }])
        );
    }

    #[test]
    fn test_decode_rejects_unknown_segment() {
        let err = Message::from_json(r#"[{"type":"Plain","text":"a"},{"type":"Dice"}]"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownDiscriminator { .. }));

        let err = Message::decode(&json!({ "type": "Plain" })).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
