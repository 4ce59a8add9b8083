//! Conversion of raw query strings into typed field values.
//!
//! A [`ScanFn`] writes the value parsed from a list of raw strings into a
//! type-erased slot. The [`ScanRegistry`] maps a concrete type to its scan
//! function, with separate tables for scalar fields and sequence
//! (`Vec<T>`) fields. A type missing from the registry is unsupported and
//! its fields are left out of record metadata.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::ScanError;

/// Writes the value parsed from `values` into `dst`.
pub type ScanFn = fn(dst: &mut dyn Any, values: &[String]) -> Result<(), ScanError>;

/// Parsing of a single raw string into a value.
///
/// Implement this for your own types and register them with
/// [`ScanRegistry::register_parsed`] to make fields of that type decodable.
///
/// ```
/// use urlfilter::{ParseValue, ScanError};
///
/// #[derive(Debug, Default, PartialEq)]
/// enum Status {
///     #[default]
///     Open,
///     Closed,
/// }
///
/// impl ParseValue for Status {
///     fn parse_value(raw: &str) -> Result<Self, ScanError> {
///         match raw {
///             "open" => Ok(Status::Open),
///             "closed" => Ok(Status::Closed),
///             other => Err(ScanError::Invalid {
///                 ty: "Status",
///                 value: other.to_string(),
///                 reason: "expected open or closed".to_string(),
///             }),
///         }
///     }
/// }
///
/// assert_eq!(Status::parse_value("closed").unwrap(), Status::Closed);
/// ```
pub trait ParseValue: Sized + Default + Any {
    /// Parses one raw value.
    fn parse_value(raw: &str) -> Result<Self, ScanError>;
}

macro_rules! parse_value_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParseValue for $ty {
                fn parse_value(raw: &str) -> Result<Self, ScanError> {
                    parse_value::<$ty>(raw)
                }
            }
        )*
    };
}

parse_value_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, String,
);

impl ParseValue for bool {
    fn parse_value(raw: &str) -> Result<Self, ScanError> {
        parse_bool(raw)
    }
}

/// Parses `raw` with [`FromStr`], mapping the failure to a [`ScanError`].
pub fn parse_value<T>(raw: &str) -> Result<T, ScanError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|err: T::Err| ScanError::Invalid {
        ty: type_name::<T>(),
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

/// Parses a boolean: `1`, `t`, `true`, `0`, `f` or `false`, ignoring case.
pub fn parse_bool(raw: &str) -> Result<bool, ScanError> {
    let truthy = ["1", "t", "true"];
    let falsy = ["0", "f", "false"];

    if truthy.iter().any(|s| raw.eq_ignore_ascii_case(s)) {
        Ok(true)
    } else if falsy.iter().any(|s| raw.eq_ignore_ascii_case(s)) {
        Ok(false)
    } else {
        Err(ScanError::Invalid {
            ty: "bool",
            value: raw.to_string(),
            reason: "expected one of 1, t, true, 0, f, false".to_string(),
        })
    }
}

fn slot<T: Any>(dst: &mut dyn Any) -> Result<&mut T, ScanError> {
    dst.downcast_mut::<T>().ok_or(ScanError::TypeMismatch {
        expected: type_name::<T>(),
    })
}

fn parse_or_default<T: ParseValue>(raw: &str) -> Result<T, ScanError> {
    if raw.is_empty() {
        Ok(T::default())
    } else {
        T::parse_value(raw)
    }
}

/// Scans the first value into a `T`. A missing or empty value resets it.
pub fn scan_scalar<T: ParseValue>(dst: &mut dyn Any, values: &[String]) -> Result<(), ScanError> {
    let slot = slot::<T>(dst)?;
    *slot = match values.first() {
        Some(raw) => parse_or_default(raw)?,
        None => T::default(),
    };
    Ok(())
}

/// Scans the first value into an `Option<T>`. A missing or empty value is `None`.
pub fn scan_option<T: ParseValue>(dst: &mut dyn Any, values: &[String]) -> Result<(), ScanError> {
    let slot = slot::<Option<T>>(dst)?;
    *slot = match values.first().map(String::as_str) {
        None | Some("") => None,
        Some(raw) => Some(T::parse_value(raw)?),
    };
    Ok(())
}

/// Scans every value into a `Vec<T>`. A single empty value clears it.
pub fn scan_sequence<T: ParseValue>(
    dst: &mut dyn Any,
    values: &[String],
) -> Result<(), ScanError> {
    let slot = slot::<Vec<T>>(dst)?;
    if let [only] = values {
        if only.is_empty() {
            slot.clear();
            return Ok(());
        }
    }

    *slot = values
        .iter()
        .map(|raw| parse_or_default(raw))
        .collect::<Result<Vec<T>, ScanError>>()?;
    Ok(())
}

static BUILTIN: Lazy<ScanRegistry> = Lazy::new(|| {
    let mut registry = ScanRegistry::empty();
    registry
        .register_parsed::<i8>()
        .register_parsed::<i16>()
        .register_parsed::<i32>()
        .register_parsed::<i64>()
        .register_parsed::<i128>()
        .register_parsed::<isize>()
        .register_parsed::<u8>()
        .register_parsed::<u16>()
        .register_parsed::<u32>()
        .register_parsed::<u64>()
        .register_parsed::<u128>()
        .register_parsed::<usize>()
        .register_parsed::<f32>()
        .register_parsed::<f64>()
        .register_parsed::<bool>()
        .register_parsed::<char>()
        .register_parsed::<String>();
    registry
});

/// Table of scan functions keyed by type.
#[derive(Clone, Default)]
pub struct ScanRegistry {
    scalars: HashMap<TypeId, ScanFn>,
    sequences: HashMap<TypeId, ScanFn>,
}

impl ScanRegistry {
    /// Creates a registry with no scan functions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with scan functions for the primitive types,
    /// `String`, and their `Option<T>` and `Vec<T>` forms.
    pub fn builtin() -> Self {
        (*BUILTIN).clone()
    }

    /// Registers the scan function for scalar fields of type `T`.
    pub fn register_scalar<T: Any>(&mut self, scan: ScanFn) -> &mut Self {
        self.scalars.insert(TypeId::of::<T>(), scan);
        self
    }

    /// Registers the scan function for sequence fields of type `T`.
    ///
    /// `T` is the sequence type itself, e.g. `Vec<u32>`.
    pub fn register_sequence<T: Any>(&mut self, scan: ScanFn) -> &mut Self {
        self.sequences.insert(TypeId::of::<T>(), scan);
        self
    }

    /// Registers `T`, `Option<T>` and `Vec<T>` using [`ParseValue`].
    pub fn register_parsed<T: ParseValue>(&mut self) -> &mut Self {
        self.register_scalar::<T>(scan_scalar::<T>)
            .register_scalar::<Option<T>>(scan_option::<T>)
            .register_sequence::<Vec<T>>(scan_sequence::<T>)
    }

    /// Returns the scalar scan function for a type.
    pub fn scalar(&self, ty: TypeId) -> Option<ScanFn> {
        self.scalars.get(&ty).copied()
    }

    /// Returns the sequence scan function for a type.
    pub fn sequence(&self, ty: TypeId) -> Option<ScanFn> {
        self.sequences.get(&ty).copied()
    }
}

impl fmt::Debug for ScanRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanRegistry")
            .field("scalars", &self.scalars.len())
            .field("sequences", &self.sequences.len())
            .finish()
    }
}
