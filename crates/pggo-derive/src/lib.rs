//! Derive macros for pggo
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;

/// Derive the `Entity` row-binding trait for a struct.
///
/// # Example
///
/// ```ignore
/// use pggo::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// struct User {
///     id: i64,
///     username: String,
///     #[pggo(column = "email_address")]
///     email: Option<String>,
///     #[pggo(skip)]
///     cached: bool,
/// }
/// ```
///
/// # Generated
///
/// - `impl pggo::Entity`: scan targets and bound values keyed by column name
/// - `COLUMNS: &'static [&'static str]` - Bound columns in field order
///
/// # Attributes
///
/// - `#[pggo(column = "name")]` - Map field to a different column name
/// - `#[pggo(skip)]` - Leave the field out of binding
#[proc_macro_derive(Entity, attributes(pggo))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
