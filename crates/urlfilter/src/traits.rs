//! Traits for derive macro support.
//!
//! [`Record`] is implemented by `#[derive(Record)]` from the
//! `urlfilter-macros` crate and tells the engine which fields a struct has.
//! [`DecodeValues`] is the opt-in custom decode capability.

use crate::error::Result;
use crate::field::DeclaredField;
use crate::values::Values;

/// Whole-record decoder bound once per type.
pub type DecodeFn<R> = fn(&mut R, &Values) -> Result<()>;

/// Trait for types that query values can be decoded into.
///
/// # Derive Usage
///
/// ```ignore
/// use urlfilter::{Record, Registry, Values};
///
/// #[derive(Default, Record)]
/// struct BookFilter {
///     #[urlfilter("'books'")]
///     table_name: (),
///
///     id: i64,
///     #[urlfilter("name,required")]
///     name: String,
///     published_gte: u16,
///     #[urlfilter(",unknown")]
///     rest: Option<Values>,
/// }
///
/// let registry = Registry::new();
/// let values: Values = [("id", "5"), ("name", "bob")].into_iter().collect();
/// let mut filter = BookFilter::default();
/// registry.decode(&mut filter, &values)?;
/// ```
///
/// # Manual Implementation
///
/// See [`DeclaredField`] for a hand-written implementation.
pub trait Record: Sized + 'static {
    /// Returns one declaration per struct field, in declaration order.
    fn declared_fields() -> Vec<DeclaredField<Self>>;

    /// Returns the decoder taking over the whole record, if the type opts in.
    ///
    /// When present, per-field decoding is skipped entirely for this type.
    fn values_decoder() -> Option<DecodeFn<Self>> {
        None
    }
}

/// Custom decoding from the full set of raw values.
///
/// A record that implements this and opts in (with
/// `#[urlfilter(decode_values)]` on the struct) decodes itself. An embedded
/// record that implements it and opts in is called with the full input
/// before the parent's fields are decoded.
///
/// ```
/// use urlfilter::{DecodeValues, Result, Values};
///
/// #[derive(Default)]
/// struct Sort {
///     column: String,
///     desc: bool,
/// }
///
/// impl DecodeValues for Sort {
///     fn decode_values(&mut self, values: &Values) -> Result<()> {
///         let order = values.string("order");
///         self.desc = order.starts_with('-');
///         self.column = order.trim_start_matches('-').to_string();
///         Ok(())
///     }
/// }
///
/// let values: Values = [("order", "-created_at")].into_iter().collect();
/// let mut sort = Sort::default();
/// sort.decode_values(&values).unwrap();
/// assert_eq!(sort.column, "created_at");
/// assert!(sort.desc);
/// ```
pub trait DecodeValues {
    /// Decodes `self` from the full input.
    fn decode_values(&mut self, values: &Values) -> Result<()>;
}
