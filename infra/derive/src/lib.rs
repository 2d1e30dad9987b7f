#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the Follower Gauge workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! gauge-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```
//!
//! The consuming crate must depend on `thiserror` because the expansion derives
//! `::thiserror::Error`.

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining error enums with attachable context.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and
///   for `Result<T, SourceError>` of every variant wrapping a source error.
/// * `From<SourceError>` impls for variants with a `source` field (or a field
///   marked `#[source]`/`#[from]`).
/// * A private `format_context` helper usable inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Every variant that wraps a source error must carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use gauge_derive::gauge_error;
/// use std::borrow::Cow;
///
/// #[gauge_error]
/// pub enum ReadError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Missing key `{key}`{}", format_context(.context))]
///     Missing { key: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, ReadError> {
///     std::fs::read_to_string(path).context("Reading settings file")
/// }
/// ```
#[proc_macro_attribute]
pub fn gauge_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
