//! urlfilter - Decode URL query values into filter structs.
//!
//! urlfilter maps query strings such as `?name=bob&age__gte=18` onto plain
//! Rust structs and turns the decoded struct back into filter conditions.
//! It provides:
//!
//! - Per-type metadata built once and cached in a shared [`Registry`]
//! - Column/operator splitting of field names (`age_gte` is `age >= ?`)
//! - Tag options: rename, `required`, `nodecode`, `nowhere`, `unknown`
//! - Flattened embedded records and custom whole-input decoders
//! - Pluggable scan functions and zero checks per field type
//! - Pagination via [`Pager`]
//!
//! # Quick Start
//!
//! ```rust
//! use urlfilter::{DeclaredField, Op, Record, Registry, Shape, Values};
//!
//! #[derive(Default)]
//! struct UserFilter {
//!     name: String,
//!     age_gte: u32,
//! }
//!
//! impl Record for UserFilter {
//!     fn declared_fields() -> Vec<DeclaredField<Self>> {
//!         vec![
//!             DeclaredField::<Self>::value::<String>(
//!                 0, "name", "", Shape::Scalar, |f| &f.name, |f| &mut f.name,
//!             ),
//!             DeclaredField::<Self>::value::<u32>(
//!                 1, "age_gte", "", Shape::Scalar, |f| &f.age_gte, |f| &mut f.age_gte,
//!             ),
//!         ]
//!     }
//! }
//!
//! let registry = Registry::new();
//! let values: Values = [("age__gte", "18")].into_iter().collect();
//!
//! let mut filter = UserFilter::default();
//! registry.decode(&mut filter, &values).unwrap();
//! assert_eq!(filter.age_gte, 18);
//!
//! // `name` is still empty, so it is omitted.
//! let meta = registry.metadata::<UserFilter>().unwrap();
//! let conditions: Vec<_> = meta.conditions(&filter).collect();
//! assert_eq!(conditions.len(), 1);
//! assert_eq!(conditions[0].column, "age");
//! assert_eq!(conditions[0].op, Op::Gte);
//! ```
//!
//! # Field Names
//!
//! A field's name is its tag rename or the snake_case form of its
//! identifier. The name is split on its last `_` into a column and an
//! operator suffix; unknown suffixes leave the whole name as the column
//! with [`Op::Eq`]. Incoming keys are looked up with a double underscore
//! (`age__gte`) so that columns containing `_` stay unambiguous.
//!
//! | Suffix | Operator |
//! |--------|----------|
//! | `exclude`, `neq` | [`Op::NotEq`] |
//! | `gt`, `gte` | [`Op::Gt`], [`Op::Gte`] |
//! | `lt`, `lte` | [`Op::Lt`], [`Op::Lte`] |
//! | `ieq` | [`Op::IEq`] |
//! | `match` | [`Op::Match`] |
//!
//! # Omission
//!
//! A field produces no condition when it holds its zero value, or when it
//! is tagged `nowhere` and not `required`.

mod condition;
mod decode;
mod error;
mod field;
mod metadata;
mod naming;
mod op;
mod pager;
mod registry;
mod scan;
mod tag;
mod traits;
mod values;
mod zero;

// Re-export public API
pub use condition::Condition;
pub use error::{Error, Result, ScanError};
pub use field::{DeclaredField, Field, Shape};
pub use metadata::{StructMetadata, TABLE_NAME_FIELD};
pub use naming::underscore;
pub use op::{split_column_operator, Op, FIELD_SEPARATOR, LOOKUP_SEPARATOR};
pub use pager::{Pager, PagerConfig};
pub use registry::{Registry, RegistryBuilder};
pub use scan::{
    parse_bool, parse_value, scan_option, scan_scalar, scan_sequence, ParseValue, ScanFn,
    ScanRegistry,
};
pub use tag::{unquote, TagOptions, OPT_NO_DECODE, OPT_NO_WHERE, OPT_REQUIRED, OPT_UNKNOWN};
pub use traits::{DecodeFn, DecodeValues, Record};
pub use values::Values;
pub use zero::{is_default, ZeroFn, ZeroRegistry};

#[cfg(feature = "derive")]
pub use urlfilter_macros::Record;
