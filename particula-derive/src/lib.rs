//! Derive macros for the particula animation engine.
//!
//! This crate provides one derive macro:
//!
//! - [`ConfigEnum`] - Index, label and key conversions for closed configuration enums
//!
//! # Usage
//!
//! The macro is re-exported from the main `particula` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use particula::ConfigEnum;
//!
//! #[derive(ConfigEnum, Clone, Copy, PartialEq)]
//! enum InteractionMode {
//!     Push,
//!     Pull,
//! }
//!
//! assert_eq!(InteractionMode::Pull.key(), "pull");
//! assert_eq!(InteractionMode::from_key("push"), Some(InteractionMode::Push));
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Split a `CamelCase` identifier into its words.
fn split_words(ident: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in ident.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `HueShift` -> `hue-shift`. Matches serde's `kebab-case` renaming.
fn kebab_key(ident: &str) -> String {
    split_words(ident)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `HueShift` -> `Hue Shift`.
fn display_label(ident: &str) -> String {
    split_words(ident).join(" ")
}

/// Derive macro for closed configuration enums.
///
/// Generates, for a fieldless enum:
///
/// - `From<Enum> for u32` and `From<u32> for Enum` (invalid values map to the first variant)
/// - `Enum::ALL`, `Enum::count()`
/// - `Enum::variants()` - display labels in declaration order, for combo boxes
/// - `from_index` / `to_index` - positional conversions for UI widgets
/// - `key()` / `from_key()` - stable kebab-case keys shared with JSON and exported code
/// - `label()` - human readable name
/// - `Display` (writes the key) and `FromStr` (parses the key)
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to a struct instead of an enum
/// - Any variant has fields (tuple or struct variants)
/// - Enum has zero variants
#[proc_macro_derive(ConfigEnum)]
pub fn derive_config_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => panic!("ConfigEnum derive only supports enums"),
    };

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            panic!(
                "ConfigEnum variants must be unit variants (no fields). \
                 Found fields on variant '{}'",
                variant.ident
            );
        }
    }

    let first_variant = &variants
        .first()
        .expect("Enum must have at least one variant")
        .ident;
    let variant_count = variants.len() as u32;

    let idents: Vec<_> = variants.iter().map(|v| &v.ident).collect();
    let keys: Vec<String> = idents.iter().map(|i| kebab_key(&i.to_string())).collect();
    let labels: Vec<String> = idents.iter().map(|i| display_label(&i.to_string())).collect();
    let indices_u32: Vec<u32> = (0..variants.len() as u32).collect();
    let indices_usize: Vec<usize> = (0..variants.len()).collect();

    let type_name = name.to_string();

    let expanded = quote! {
        impl From<#name> for u32 {
            fn from(value: #name) -> u32 {
                match value {
                    #(#name::#idents => #indices_u32),*
                }
            }
        }

        impl From<u32> for #name {
            fn from(value: u32) -> #name {
                match value {
                    #(#indices_u32 => #name::#idents,)*
                    _ => #name::#first_variant,
                }
            }
        }

        impl #name {
            /// Every variant in declaration order.
            pub const ALL: &'static [#name] = &[#(#name::#idents),*];

            /// Returns the number of variants.
            pub const fn count() -> u32 {
                #variant_count
            }

            /// Display labels in declaration order.
            pub fn variants() -> &'static [&'static str] {
                &[#(#labels),*]
            }

            /// Variant at `idx`, falling back to the first variant.
            pub fn from_index(idx: usize) -> Self {
                match idx {
                    #(#indices_usize => #name::#idents,)*
                    _ => #name::#first_variant,
                }
            }

            /// Position of this variant in declaration order.
            pub fn to_index(&self) -> usize {
                match self {
                    #(#name::#idents => #indices_usize),*
                }
            }

            /// Stable kebab-case key.
            pub fn key(&self) -> &'static str {
                match self {
                    #(#name::#idents => #keys),*
                }
            }

            /// Human readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    #(#name::#idents => #labels),*
                }
            }

            /// Parse a kebab-case key.
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    #(#keys => Some(#name::#idents),)*
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.key())
            }
        }

        impl ::std::str::FromStr for #name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                #name::from_key(s).ok_or_else(|| {
                    format!(
                        "unknown {} '{}', expected one of: {}",
                        #type_name,
                        s,
                        [#(#keys),*].join(", ")
                    )
                })
            }
        }
    };

    TokenStream::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_key() {
        assert_eq!(kebab_key("Push"), "push");
        assert_eq!(kebab_key("HueShift"), "hue-shift");
        assert_eq!(kebab_key("TopToBottom"), "top-to-bottom");
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("AllDirections"), "All Directions");
        assert_eq!(display_label("Circle"), "Circle");
    }
}
