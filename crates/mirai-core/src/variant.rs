//! Closed sum types addressed by payload type.
//!
//! A closed variant is an enum whose every variant wraps exactly one payload
//! type, with a generated tag enum naming the kinds. The traits here provide
//! the typed access layer on top of it:
//!
//! - [`VariantTag`] - the kind enumeration, its wire names and order
//! - [`ClosedVariant`] - construction, typed queries and closure dispatch
//! - [`Payload`] - the compile-time "T is a member of V" relation
//! - [`TypePattern`] - position-exact matching of a slice against a type list
//!
//! Implementations are generated by `#[derive(ClosedVariant)]`:
//!
//! ```rust,ignore
//! use mirai_core::{ClosedVariant, Segment, segment::{At, Plain}};
//!
//! let seg = Segment::make(Plain::new("hello"));
//! assert!(seg.is::<Plain>());
//! assert_eq!(seg.get_if::<Plain>().map(|p| p.text.as_str()), Some("hello"));
//! assert!(seg.get_if::<At>().is_none());
//! ```

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DecodeError, DecodeResult};

// ============================================================================
// Traits
// ============================================================================

/// The fieldless kind enumeration of a closed variant.
pub trait VariantTag:
    Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static
{
    /// Every kind, in declaration order.
    const ALL: &'static [Self];

    /// Number of kinds.
    const COUNT: usize = Self::ALL.len();

    /// Wire name of the kind.
    fn name(self) -> &'static str;

    /// Case-sensitive lookup by wire name.
    fn from_name(name: &str) -> Option<Self>;

    /// Zero-based position in [`ALL`](Self::ALL).
    fn index(self) -> usize;
}

/// A closed sum type whose kinds are addressed by payload type.
pub trait ClosedVariant: Sized + 'static {
    type Tag: VariantTag;

    /// Kind of the active payload.
    fn tag(&self) -> Self::Tag;

    /// Wraps a payload. Only member types of this variant are accepted.
    #[inline]
    fn make<T: Payload<Self>>(value: T) -> Self {
        value.wrap()
    }

    #[inline]
    fn get_if<T: Payload<Self>>(&self) -> Option<&T> {
        T::peek(self)
    }

    #[inline]
    fn get_if_mut<T: Payload<Self>>(&mut self) -> Option<&mut T> {
        T::peek_mut(self)
    }

    #[inline]
    fn is<T: Payload<Self>>(&self) -> bool {
        self.tag() == T::TAG
    }

    /// Moves the payload out, or hands the variant back if the kind differs.
    #[inline]
    fn try_into_payload<T: Payload<Self>>(self) -> Result<T, Self> {
        T::take(self)
    }

    /// Runs `f` only when the active kind is `T`.
    #[inline]
    fn visit<T: Payload<Self>, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        T::peek(self).map(f)
    }
}

/// Membership of a payload type in a closed variant.
///
/// Each payload type implements this once per variant it belongs to, so a
/// type listed twice fails to compile.
pub trait Payload<V: ClosedVariant>: Sized + 'static {
    /// Kind this payload is stored under.
    const TAG: V::Tag;

    fn wrap(self) -> V;

    fn peek(variant: &V) -> Option<&Self>;

    fn peek_mut(variant: &mut V) -> Option<&mut Self>;

    fn take(variant: V) -> Result<Self, V>;
}

// ============================================================================
// Type patterns
// ============================================================================

/// A tuple of payload types matched position by position against a slice.
pub trait TypePattern<V: ClosedVariant> {
    /// Tuple of references to the matched payloads.
    type Output<'a>
    where
        V: 'a;

    /// Required slice length.
    const LEN: usize;

    /// Returns the payloads when `items` has exactly [`LEN`](Self::LEN)
    /// elements and each has the kind at the same position of the pattern.
    fn match_slice(items: &[V]) -> Option<Self::Output<'_>>;
}

macro_rules! impl_type_pattern {
    ($len:expr; $($ty:ident $idx:tt),+) => {
        impl<V: ClosedVariant, $($ty: Payload<V>),+> TypePattern<V> for ($($ty,)+) {
            type Output<'a> = ($(&'a $ty,)+) where V: 'a;

            const LEN: usize = $len;

            fn match_slice(items: &[V]) -> Option<Self::Output<'_>> {
                if items.len() != $len {
                    return None;
                }
                Some(($($ty::peek(&items[$idx])?,)+))
            }
        }
    };
}

impl_type_pattern!(1; A 0);
impl_type_pattern!(2; A 0, B 1);
impl_type_pattern!(3; A 0, B 1, C 2);
impl_type_pattern!(4; A 0, B 1, C 2, D 3);
impl_type_pattern!(5; A 0, B 1, C 2, D 3, E 4);
impl_type_pattern!(6; A 0, B 1, C 2, D 3, E 4, F 5);
impl_type_pattern!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_type_pattern!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

/// Matches `items` against the tuple of payload types `P`.
///
/// ```rust,ignore
/// if let Some((text, at)) = match_types::<_, (Plain, At)>(&chain) {
///     println!("{} -> {}", text.text, at.target);
/// }
/// ```
pub fn match_types<V: ClosedVariant, P: TypePattern<V>>(items: &[V]) -> Option<P::Output<'_>> {
    P::match_slice(items)
}

// ============================================================================
// Tagged decoding
// ============================================================================

/// Decodes a document whose kind is named by the string field `field`.
///
/// The discriminator is checked against the variant's tag table before the
/// payload is deserialized, so an unknown kind is reported as such rather
/// than as a generic shape mismatch.
pub fn decode_tagged<V>(doc: &Value, field: &'static str) -> DecodeResult<V>
where
    V: ClosedVariant + DeserializeOwned,
{
    let name = doc
        .get(field)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingDiscriminator { field })?;

    let tag = V::Tag::from_name(name).ok_or_else(|| DecodeError::UnknownDiscriminator {
        field,
        name: name.to_owned(),
    })?;

    V::deserialize(doc).map_err(|source| DecodeError::Malformed {
        kind: tag.name(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{At, AtAll, Face, Image, Plain, Segment, SegmentType};

    #[test]
    fn test_tag_table() {
        assert_eq!(SegmentType::COUNT, 10);
        assert_eq!(SegmentType::ALL[0], SegmentType::At);
        assert_eq!(SegmentType::Plain.name(), "Plain");
        assert_eq!(SegmentType::from_name("FlashImage"), Some(SegmentType::FlashImage));
        assert_eq!(SegmentType::from_name("plain"), None);
        for (i, tag) in SegmentType::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
            assert_eq!(SegmentType::from_name(tag.name()), Some(*tag));
        }
    }

    #[test]
    fn test_make_and_query() {
        let mut seg = Segment::make(Plain::new("hi"));
        assert_eq!(seg.tag(), SegmentType::Plain);
        assert!(seg.is::<Plain>());
        assert!(!seg.is::<At>());
        assert!(seg.get_if::<At>().is_none());

        if let Some(plain) = seg.get_if_mut::<Plain>() {
            plain.text.push('!');
        }
        assert_eq!(seg.get_if::<Plain>().map(|p| p.text.as_str()), Some("hi!"));

        let seg = match seg.try_into_payload::<At>() {
            Ok(_) => panic!("kind should not match"),
            Err(seg) => seg,
        };
        assert_eq!(seg.try_into_payload::<Plain>().ok(), Some(Plain::new("hi!")));
    }

    #[test]
    fn test_visit_skips_other_kinds() {
        let seg = Segment::make(At::new(42));
        assert_eq!(seg.visit(|at: &At| at.target.0), Some(42));
        assert_eq!(seg.visit(|p: &Plain| p.text.len()), None);
    }

    #[test]
    fn test_match_types() {
        let chain = vec![Segment::plain("hi"), Segment::at(42)];
        let matched = match_types::<_, (Plain, At)>(&chain);
        assert_eq!(
            matched.map(|(p, a)| (p.text.as_str(), a.target.0)),
            Some(("hi", 42))
        );

        assert!(match_types::<_, (At, Plain)>(&chain).is_none());
        assert!(match_types::<_, (Plain,)>(&chain).is_none());
        assert!(match_types::<_, (Plain, At, AtAll)>(&chain).is_none());
        assert!(match_types::<Segment, (Plain, Face, Image)>(&[]).is_none());
    }

    #[test]
    fn test_decode_tagged_errors() {
        let doc = serde_json::json!({ "text": "no type" });
        assert!(matches!(
            decode_tagged::<Segment>(&doc, "type"),
            Err(DecodeError::MissingDiscriminator { field: "type" })
        ));

        let doc = serde_json::json!({ "type": "MusicShare" });
        assert!(matches!(
            decode_tagged::<Segment>(&doc, "type"),
            Err(DecodeError::UnknownDiscriminator { name, .. }) if name == "MusicShare"
        ));

        let doc = serde_json::json!({ "type": "At", "target": "not a number" });
        assert!(matches!(
            decode_tagged::<Segment>(&doc, "type"),
            Err(DecodeError::Malformed { kind: "At", .. })
        ));
    }
}
