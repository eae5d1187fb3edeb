//! Procedural macros for the mirai client model.
//!
//! This crate provides:
//!
//! - `#[derive(ClosedVariant)]` - Turns an enum of single-payload variants into
//!   a closed, tag-addressable sum type
//!
//! # ClosedVariant Derive Macro
//!
//! ```rust,ignore
//! use mirai_macros::ClosedVariant;
//!
//! #[derive(Debug, Clone, ClosedVariant)]
//! #[closed_variant(tag = "SegmentType", visitor = "SegmentVisitor", mapper = "SegmentMapper")]
//! pub enum Segment {
//!     At(At),
//!     AtAll(AtAll),
//!     Plain(Plain),
//! }
//!
//! let seg = Segment::make(Plain::new("hi"));
//! assert_eq!(seg.tag(), SegmentType::Plain);
//! assert!(seg.get_if::<At>().is_none());
//! ```

mod variant;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives the closed-variant machinery for an enum.
///
/// Every variant must be a tuple variant holding exactly one payload type, and
/// each payload type may appear only once. The macro generates:
///
/// - a fieldless tag enum listing the kinds in declaration order
/// - `impl ClosedVariant` for the enum and `impl Payload<Enum>` + `From` for
///   every payload type
/// - a visitor trait (every method defaults to a no-op) used by `dispatch`
/// - a mapper trait (every method required) used by `apply`
/// - a compile-time assertion that the tag enum and the payload list agree
///
/// # Attributes
///
/// - `#[closed_variant(tag = "...")]` - Name of the generated tag enum (required)
/// - `#[closed_variant(visitor = "...")]` - Name of the visitor trait (default: `{Enum}Visitor`)
/// - `#[closed_variant(mapper = "...")]` - Name of the mapper trait (default: `{Enum}Mapper`)
/// - `#[closed_variant(rename = "...")]` on a variant - Override its discriminator name
#[proc_macro_derive(ClosedVariant, attributes(closed_variant))]
pub fn derive_closed_variant(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match variant::derive_closed_variant(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
