//! Proc macros for urlfilter.
//!
//! This crate provides the derive macro that declares a struct's fields to
//! the urlfilter engine.
//!
//! # Available Macros
//!
//! ## Derive Macros
//!
//! - [`Record`] - Generate the `Record` implementation of a filter struct
//!
//! # Examples
//!
//! For working examples, see `urlfilter/tests/record_derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for a struct with named fields.
///
/// Every field is declared in order. Field behavior is controlled with the
/// `#[urlfilter(...)]` attribute, whose tag string follows the urlfilter tag
/// grammar: a rename followed by comma-separated options.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `"tag"` or `tag = "tag"` | Rename and options, e.g. `"title,required"` |
/// | `flatten` | Embed a `Record` (or `Box<Record>`), flattening its fields |
/// | `skip` | Do not declare the field at all |
/// | `decode_values` | Call the field's `DecodeValues` impl with the whole input |
///
/// Tag options:
///
/// | Option | Effect |
/// |--------|--------|
/// | `-` (whole tag) | Ignore the field |
/// | `required` | Always a filter field; combining it with `nowhere` is an error |
/// | `nodecode` | Never decode the field from input |
/// | `nowhere` | Never produce a filter condition |
/// | `unknown` | Collect unmatched keys (`Values` or `HashMap<String, Vec<String>>`) |
///
/// A field named `table_name` is the table-name sentinel: its tag is the
/// table name and it is not a filter field.
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `decode_values` | The struct decodes itself through its `DecodeValues` impl |
///
/// # Example
///
/// ```ignore
/// use urlfilter::{Pager, Record, Registry, Values};
///
/// #[derive(Default, Record)]
/// struct BookFilter {
///     #[urlfilter("'books'")]
///     table_name: (),
///
///     #[urlfilter(flatten)]
///     pager: Pager,
///
///     #[urlfilter("title,required")]
///     name: String,
///     author_ids: Vec<i64>,
///     published_gte: u16,
///
///     #[urlfilter(skip)]
///     cache: Option<String>,
///
///     #[urlfilter(",unknown")]
///     rest: Values,
/// }
///
/// let registry = Registry::new();
/// let mut filter = BookFilter::default();
/// registry.decode(&mut filter, &values)?;
/// ```
///
/// # Generated Code
///
/// ```ignore
/// impl ::urlfilter::Record for BookFilter {
///     fn declared_fields() -> Vec<::urlfilter::DeclaredField<Self>> {
///         vec![
///             ::urlfilter::DeclaredField::<Self>::value::<()>(
///                 0usize, "table_name", "'books'", ::urlfilter::Shape::Scalar,
///                 |s| &s.table_name, |s| &mut s.table_name,
///             ),
///             ::urlfilter::DeclaredField::<Self>::embedded::<Pager>(
///                 1usize, "pager", "", |s| &s.pager, |s| &mut s.pager,
///             ),
///             // ...
///         ]
///     }
/// }
/// ```
#[proc_macro_derive(Record, attributes(urlfilter))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
