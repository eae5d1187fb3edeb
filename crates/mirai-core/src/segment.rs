//! Message segment types.
//!
//! A segment is one typed unit of message content. [`Segment`] is a closed
//! variant over the ten content kinds understood by the server:
//!
//! | kind | stringified |
//! |------|-------------|
//! | [`At`] | `{at:<target>}` |
//! | [`AtAll`] | `{at_all}` |
//! | [`Face`] | `{face:<id or name>}` |
//! | [`Plain`] | the escaped text |
//! | [`Image`] | `{image:<id, url or path>}` |
//! | [`FlashImage`] | `{flash_image:<id, url or path>}` |
//! | [`Xml`] | `{xml:<raw>}` |
//! | [`Json`] | `{json:<raw>}` |
//! | [`App`] | `{app:<raw>}` |
//! | [`Poke`] | `{poke:<name>}` |
//!
//! Textual payloads inside a block are escaped with the same codec as plain
//! text, so a stringified message never contains a stray brace.
//!
//! # Example
//!
//! ```rust,ignore
//! use mirai_core::Segment;
//!
//! let text = Segment::plain("Hello, ");
//! let at = Segment::at(10001000);
//! let face = Segment::face_id(178);
//! assert_eq!(at.stringify(), "{at:10001000}");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mirai_macros::ClosedVariant;

use crate::error::DecodeResult;
use crate::message::escape;
use crate::types::UserId;
use crate::variant::decode_tagged;

// ============================================================================
// Segment Enum
// ============================================================================

/// A message segment.
///
/// Serialized with a `"type"` discriminator equal to the kind name, e.g.
/// `{"type": "Plain", "text": "hi"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ClosedVariant)]
#[serde(tag = "type")]
#[closed_variant(tag = "SegmentType", visitor = "SegmentVisitor", mapper = "SegmentMapper")]
pub enum Segment {
    /// Mention of a single user.
    At(At),
    /// Mention of every group member.
    AtAll(AtAll),
    /// Built-in emoticon.
    Face(Face),
    /// Plain text.
    Plain(Plain),
    Image(Image),
    /// Image that can be viewed once.
    FlashImage(FlashImage),
    /// Rich XML card.
    Xml(Xml),
    /// Rich JSON card.
    Json(Json),
    /// Mini-app card.
    App(App),
    /// Poke action.
    Poke(Poke),
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(Plain::new(text))
    }

    pub fn at(target: impl Into<UserId>) -> Self {
        Self::At(At::new(target))
    }

    pub fn at_all() -> Self {
        Self::AtAll(AtAll {})
    }

    pub fn face_id(id: i32) -> Self {
        Self::Face(Face::from_id(id))
    }

    pub fn face_name(name: impl Into<String>) -> Self {
        Self::Face(Face::from_name(name))
    }

    pub fn image_id(id: impl Into<String>) -> Self {
        Self::Image(Image::from_id(id))
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::Image(Image::from_url(url))
    }

    pub fn image_path(path: impl Into<String>) -> Self {
        Self::Image(Image::from_path(path))
    }

    pub fn flash_image_id(id: impl Into<String>) -> Self {
        Self::FlashImage(FlashImage(Image::from_id(id)))
    }

    pub fn flash_image_url(url: impl Into<String>) -> Self {
        Self::FlashImage(FlashImage(Image::from_url(url)))
    }

    pub fn flash_image_path(path: impl Into<String>) -> Self {
        Self::FlashImage(FlashImage(Image::from_path(path)))
    }

    pub fn xml(xml: impl Into<String>) -> Self {
        Self::Xml(Xml { xml: xml.into() })
    }

    pub fn json(json: impl Into<String>) -> Self {
        Self::Json(Json { json: json.into() })
    }

    pub fn app(content: impl Into<String>) -> Self {
        Self::App(App {
            content: content.into(),
        })
    }

    pub fn poke(name: impl Into<String>) -> Self {
        Self::Poke(Poke { name: name.into() })
    }

    /// Returns the text payload if this is a plain-text segment.
    #[inline]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(plain) => Some(&plain.text),
            _ => None,
        }
    }

    #[inline]
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }

    /// Canonical textual form of this segment.
    pub fn stringify(&self) -> String {
        self.apply(&mut Stringifier)
    }

    /// Decodes a segment document, selecting the kind by its `"type"` field.
    pub fn decode(doc: &Value) -> DecodeResult<Self> {
        decode_tagged(doc, "type")
    }

    pub fn from_json(json: &str) -> DecodeResult<Self> {
        let doc: Value = serde_json::from_str(json)?;
        Self::decode(&doc)
    }

    /// Encodes this segment as a wire document.
    pub fn encode(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

struct Stringifier;

impl SegmentMapper for Stringifier {
    type Output = String;

    fn map_at(&mut self, value: &At) -> String {
        value.stringify()
    }

    fn map_at_all(&mut self, value: &AtAll) -> String {
        value.stringify()
    }

    fn map_face(&mut self, value: &Face) -> String {
        value.stringify()
    }

    fn map_plain(&mut self, value: &Plain) -> String {
        value.stringify()
    }

    fn map_image(&mut self, value: &Image) -> String {
        value.stringify()
    }

    fn map_flash_image(&mut self, value: &FlashImage) -> String {
        value.stringify()
    }

    fn map_xml(&mut self, value: &Xml) -> String {
        value.stringify()
    }

    fn map_json(&mut self, value: &Json) -> String {
        value.stringify()
    }

    fn map_app(&mut self, value: &App) -> String {
        value.stringify()
    }

    fn map_poke(&mut self, value: &Poke) -> String {
        value.stringify()
    }
}

fn block(kind: &str, payload: &str) -> String {
    format!("{{{kind}:{payload}}}")
}

// ============================================================================
// Payload types
// ============================================================================

/// Mention of a user. Two mentions are equal when they target the same user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct At {
    pub target: UserId,
    /// Text shown in place of the mention; filled in by the server.
    #[serde(default)]
    pub display: String,
}

impl At {
    pub fn new(target: impl Into<UserId>) -> Self {
        Self {
            target: target.into(),
            display: String::new(),
        }
    }

    pub fn stringify(&self) -> String {
        block("at", &self.target.to_string())
    }
}

impl PartialEq for At {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

/// Mention of all members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtAll {}

impl AtAll {
    pub fn stringify(&self) -> String {
        "{at_all}".to_owned()
    }
}

impl PartialEq for AtAll {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

/// Built-in emoticon, identified by id or by name.
///
/// When both sides carry an id the ids are compared, otherwise the names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Face {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Face {
    pub fn from_id(id: i32) -> Self {
        Self {
            face_id: Some(id),
            name: None,
        }
    }

    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            face_id: None,
            name: Some(name.into()),
        }
    }

    pub fn stringify(&self) -> String {
        match (&self.face_id, &self.name) {
            (Some(id), _) => block("face", &id.to_string()),
            (None, Some(name)) => block("face", &escape(name)),
            (None, None) => block("face", ""),
        }
    }
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        match (self.face_id, other.face_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plain {
    pub text: String,
}

impl Plain {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn stringify(&self) -> String {
        escape(&self.text)
    }
}

/// Image reference. At least one of the three locators is normally set.
///
/// Equality uses the first locator present on both sides, in the order
/// id, url; two images sharing neither compare by path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Image {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            image_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// The identifying locator: id, else url, else path.
    pub fn locator(&self) -> Option<&str> {
        self.image_id
            .as_deref()
            .or(self.url.as_deref())
            .or(self.path.as_deref())
    }

    pub fn stringify(&self) -> String {
        block("image", &escape(self.locator().unwrap_or_default()))
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (&self.image_id, &other.image_id) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.url, &other.url) {
            return a == b;
        }
        self.path == other.path
    }
}

/// Image that disappears after being viewed once. Same locators as [`Image`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashImage(pub Image);

impl FlashImage {
    pub fn stringify(&self) -> String {
        block("flash_image", &escape(self.0.locator().unwrap_or_default()))
    }
}

impl std::ops::Deref for FlashImage {
    type Target = Image;

    fn deref(&self) -> &Image {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xml {
    pub xml: String,
}

impl Xml {
    pub fn stringify(&self) -> String {
        block("xml", &escape(&self.xml))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Json {
    pub json: String,
}

impl Json {
    pub fn stringify(&self) -> String {
        block("json", &escape(&self.json))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub content: String,
}

impl App {
    pub fn stringify(&self) -> String {
        block("app", &escape(&self.content))
    }
}

/// Poke action, e.g. `"ChuoYiChuo"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poke {
    pub name: String,
}

impl Poke {
    pub fn stringify(&self) -> String {
        block("poke", &escape(&self.name))
    }
}
