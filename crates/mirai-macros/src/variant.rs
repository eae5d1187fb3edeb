//! ClosedVariant derive macro implementation.
//!
//! # Overview
//!
//! `#[derive(ClosedVariant)]` on `enum E { A(TA), B(TB), .. }` generates:
//!
//! 1. `enum Tag { A, B, .. }` - the fieldless kind enumeration
//! 2. `impl VariantTag for Tag` - name table, lookup by name, declaration order
//! 3. `impl ClosedVariant for E` - `tag()` plus the typed access defaults
//! 4. `impl Payload<E> for TA` (and `From<TA> for E`) for every payload
//! 5. `trait Visitor` / `trait Mapper` with `E::dispatch` / `E::apply`
//! 6. a `const` assertion tying the tag count to the variant count
//!
//! # Enum attributes `#[closed_variant(...)]`
//!
//! | Key | Example | Required | Description |
//! |-----|---------|----------|-------------|
//! | `tag` | `"SegmentType"` | **Yes** | Name of the generated tag enum |
//! | `visitor` | `"SegmentVisitor"` | No | Partial visitor trait (default `{Enum}Visitor`) |
//! | `mapper` | `"SegmentMapper"` | No | Exhaustive mapper trait (default `{Enum}Mapper`) |
//!
//! # Variant attributes `#[closed_variant(...)]`
//!
//! | Key | Description |
//! |-----|-------------|
//! | `rename` | Discriminator name used by `VariantTag::name` / `from_name` |

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type, spanned::Spanned};

// ============================================================================
// Attribute structures
// ============================================================================

/// Enum-level `#[closed_variant(...)]` settings.
struct EnumAttrs {
    tag: Ident,
    visitor: Ident,
    mapper: Ident,
}

/// One parsed `Kind(Payload)` variant.
struct VariantInfo {
    ident: Ident,
    payload: Type,
    name: String,
    method: String,
}

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_closed_variant(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "ClosedVariant cannot be derived for generic enums",
        ));
    }

    let data = match &input.data {
        Data::Enum(data) => data,
        Data::Struct(_) => {
            return Err(syn::Error::new(
                input.span(),
                "ClosedVariant can only be derived for enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "ClosedVariant cannot be derived for unions",
            ));
        }
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new(
            name.span(),
            "ClosedVariant requires at least one variant",
        ));
    }

    let attrs = parse_enum_attrs(&input.attrs, name)?;
    let variants = data
        .variants
        .iter()
        .map(|variant| {
            let payload = match &variant.fields {
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                    fields.unnamed[0].ty.clone()
                }
                _ => {
                    return Err(syn::Error::new(
                        variant.span(),
                        "ClosedVariant variants must hold exactly one unnamed payload, e.g. `Plain(Plain)`",
                    ));
                }
            };
            let name = parse_variant_rename(&variant.attrs)?
                .unwrap_or_else(|| variant.ident.to_string());
            Ok(VariantInfo {
                ident: variant.ident.clone(),
                payload,
                name,
                method: to_snake_case(&variant.ident.to_string()),
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let vis = &input.vis;
    let tag_enum = generate_tag_enum(vis, name, &attrs.tag, &variants);
    let variant_impl = generate_variant_impl(name, &attrs.tag, &variants);
    let payload_impls = generate_payload_impls(name, &attrs.tag, &variants);
    let visitor = generate_visitor(vis, name, &attrs, &variants);

    Ok(quote! {
        #tag_enum
        #variant_impl
        #payload_impls
        #visitor
    })
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_enum_attrs(attrs: &[Attribute], name: &Ident) -> syn::Result<EnumAttrs> {
    let mut tag: Option<Ident> = None;
    let mut visitor: Option<Ident> = None;
    let mut mapper: Option<Ident> = None;

    for attr in attrs {
        if !attr.path().is_ident("closed_variant") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let lit = meta.value()?.parse::<LitStr>()?;
            let ident = Ident::new(&lit.value(), lit.span());
            if meta.path.is_ident("tag") {
                tag = Some(ident);
            } else if meta.path.is_ident("visitor") {
                visitor = Some(ident);
            } else if meta.path.is_ident("mapper") {
                mapper = Some(ident);
            } else {
                return Err(meta.error("expected `tag`, `visitor` or `mapper`"));
            }
            Ok(())
        })?;
    }

    let tag = tag.ok_or_else(|| {
        syn::Error::new(
            name.span(),
            "#[derive(ClosedVariant)] requires #[closed_variant(tag = \"…\")]",
        )
    })?;

    Ok(EnumAttrs {
        tag,
        visitor: visitor.unwrap_or_else(|| format_ident!("{}Visitor", name)),
        mapper: mapper.unwrap_or_else(|| format_ident!("{}Mapper", name)),
    })
}

fn parse_variant_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;

    for attr in attrs {
        if !attr.path().is_ident("closed_variant") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                rename = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `rename`"))
            }
        })?;
    }

    Ok(rename)
}

/// `BotOfflineEventActive` -> `bot_offline_event_active`, `AtAll` -> `at_all`.
fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || acronym_end {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

// ============================================================================
// Code generation
// ============================================================================

fn generate_tag_enum(
    vis: &syn::Visibility,
    name: &Ident,
    tag: &Ident,
    variants: &[VariantInfo],
) -> TokenStream {
    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let names: Vec<LitStr> = variants
        .iter()
        .map(|v| LitStr::new(&v.name, v.ident.span()))
        .collect();
    let count = variants.len();
    let doc = format!("Kind discriminator of [`{name}`], in declaration order.");
    let mismatch = format!("Mismatched enum and variant size ({name})");

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #vis enum #tag {
            #(#idents,)*
        }

        impl ::mirai_core::variant::VariantTag for #tag {
            const ALL: &'static [Self] = &[#(Self::#idents,)*];

            fn name(self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    #(#names => Some(Self::#idents),)*
                    _ => None,
                }
            }

            #[inline]
            fn index(self) -> usize {
                self as usize
            }
        }

        impl ::std::fmt::Display for #tag {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(::mirai_core::variant::VariantTag::name(*self))
            }
        }

        const _: () = assert!(
            <#tag as ::mirai_core::variant::VariantTag>::ALL.len() == #count,
            #mismatch
        );
    }
}

fn generate_variant_impl(name: &Ident, tag: &Ident, variants: &[VariantInfo]) -> TokenStream {
    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();

    quote! {
        impl ::mirai_core::variant::ClosedVariant for #name {
            type Tag = #tag;

            fn tag(&self) -> #tag {
                match self {
                    #(Self::#idents(_) => #tag::#idents,)*
                }
            }
        }
    }
}

fn generate_payload_impls(name: &Ident, tag: &Ident, variants: &[VariantInfo]) -> TokenStream {
    let impls = variants.iter().map(|v| {
        let ident = &v.ident;
        let payload = &v.payload;
        quote! {
            #[allow(unreachable_patterns)]
            impl ::mirai_core::variant::Payload<#name> for #payload {
                const TAG: #tag = #tag::#ident;

                #[inline]
                fn wrap(self) -> #name {
                    #name::#ident(self)
                }

                #[inline]
                fn peek(variant: &#name) -> Option<&Self> {
                    match variant {
                        #name::#ident(value) => Some(value),
                        _ => None,
                    }
                }

                #[inline]
                fn peek_mut(variant: &mut #name) -> Option<&mut Self> {
                    match variant {
                        #name::#ident(value) => Some(value),
                        _ => None,
                    }
                }

                #[inline]
                fn take(variant: #name) -> Result<Self, #name> {
                    match variant {
                        #name::#ident(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }

            impl From<#payload> for #name {
                #[inline]
                fn from(value: #payload) -> Self {
                    #name::#ident(value)
                }
            }
        }
    });

    quote! { #(#impls)* }
}

fn generate_visitor(
    vis: &syn::Visibility,
    name: &Ident,
    attrs: &EnumAttrs,
    variants: &[VariantInfo],
) -> TokenStream {
    let visitor = &attrs.visitor;
    let mapper = &attrs.mapper;

    let visit_methods: Vec<Ident> = variants
        .iter()
        .map(|v| Ident::new(&format!("visit_{}", v.method), Span::call_site()))
        .collect();
    let map_methods: Vec<Ident> = variants
        .iter()
        .map(|v| Ident::new(&format!("map_{}", v.method), Span::call_site()))
        .collect();
    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let payloads: Vec<&Type> = variants.iter().map(|v| &v.payload).collect();

    let visitor_doc = format!(
        "Partial visitor over [`{name}`]. Kinds without an override are skipped."
    );
    let mapper_doc = format!(
        "Exhaustive mapper over [`{name}`]. Every kind must produce an `Output`."
    );

    quote! {
        #[doc = #visitor_doc]
        #vis trait #visitor {
            #(
                fn #visit_methods(&mut self, value: &#payloads) {
                    let _ = value;
                }
            )*
        }

        #[doc = #mapper_doc]
        #vis trait #mapper {
            type Output;

            #(
                fn #map_methods(&mut self, value: &#payloads) -> Self::Output;
            )*
        }

        impl #name {
            /// Invokes the visitor method matching the active kind.
            pub fn dispatch<V: #visitor + ?Sized>(&self, visitor: &mut V) {
                match self {
                    #(Self::#idents(value) => visitor.#visit_methods(value),)*
                }
            }

            /// Maps the active payload through the mapper and returns its output.
            pub fn apply<M: #mapper + ?Sized>(&self, mapper: &mut M) -> M::Output {
                match self {
                    #(Self::#idents(value) => mapper.#map_methods(value),)*
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("At"), "at");
        assert_eq!(to_snake_case("AtAll"), "at_all");
        assert_eq!(to_snake_case("FlashImage"), "flash_image");
        assert_eq!(
            to_snake_case("BotOfflineEventActive"),
            "bot_offline_event_active"
        );
        assert_eq!(to_snake_case("XMLPayload"), "xml_payload");
    }

    #[test]
    fn test_rejects_struct_variants() {
        let input: DeriveInput = syn::parse_quote! {
            #[closed_variant(tag = "KindType")]
            enum Kind {
                A { x: i32 },
            }
        };
        assert!(derive_closed_variant(&input).is_err());
    }

    #[test]
    fn test_requires_tag_attribute() {
        let input: DeriveInput = syn::parse_quote! {
            enum Kind {
                A(u8),
            }
        };
        let err = derive_closed_variant(&input).err().map(|e| e.to_string());
        assert!(err.is_some_and(|e| e.contains("tag")));
    }

    #[test]
    fn test_generates_tag_enum() {
        let input: DeriveInput = syn::parse_quote! {
            #[closed_variant(tag = "KindType")]
            pub enum Kind {
                Alpha(A),
                #[closed_variant(rename = "beta")]
                Beta(B),
            }
        };
        let tokens = derive_closed_variant(&input).map(|t| t.to_string());
        let tokens = tokens.unwrap_or_default();
        assert!(tokens.contains("enum KindType"));
        assert!(tokens.contains("\"beta\""));
        assert!(tokens.contains("trait KindVisitor"));
        assert!(tokens.contains("visit_alpha"));
        assert!(tokens.contains("map_beta"));
    }
}
