//! # zero-validator-macros
//!
//! `#[derive(Record)]` for `zero-validator`. Use it through the re-export in
//! `zero_validator` rather than depending on this crate directly.
//!
//! ```ignore
//! use zero_validator::Record;
//!
//! #[derive(Record)]
//! #[record(messages)]
//! pub struct Post {
//!     #[record(embed)]
//!     base: Base,
//!
//!     #[tag(valid = "required,min=3,max=64", json = "title")]
//!     title: String,
//!
//!     #[record(nested)]
//!     author: Author,
//!
//!     #[record(skip)]
//!     cache: Vec<u8>,
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod record;
mod support;

/// Derive macro for the `Record` trait.
///
/// # Attributes
///
/// ## Container attributes (`#[record(...)]` on the struct)
///
/// - `messages` - Routes `Record::messages` to the struct's `FieldMessages` impl
///
/// ## Field attributes
///
/// - `#[tag(key = "...", ...)]` - Tag strings, one per key (e.g. `valid = "required,min=3"`)
/// - `#[record(rename = "...")]` - Declared name reported to the engine (default: the field ident)
/// - `#[record(embed)]` - Flattens the field's own `Record` fields into this one
/// - `#[record(nested)]` - Reports the field as an opaque struct value
/// - `#[record(skip)]` - Leaves the field out
///
/// Every other field must implement `AsFieldValue`.
#[proc_macro_derive(Record, attributes(record, tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}
