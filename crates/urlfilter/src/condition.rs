//! Filter conditions derived from a decoded record.
//!
//! A [`Condition`] is one filter predicate: a column, an operator and the
//! value held by the record. Conditions are produced by
//! [`StructMetadata::conditions`](crate::StructMetadata::conditions), which
//! skips every field that [`Field::omit`](crate::Field::omit) rules out.

use std::any::Any;

use crate::op::Op;

/// A single filter predicate taken from a record.
///
/// # Example
///
/// ```
/// use urlfilter::{Condition, Op};
///
/// let age = 30u32;
/// let condition = Condition {
///     column: "age",
///     op: Op::Gte,
///     value: &age,
/// };
///
/// assert_eq!(condition.value_as::<u32>(), Some(&30));
/// assert_eq!(condition.value_as::<i64>(), None);
/// assert_eq!(condition.to_string(), "age gte");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Condition<'a> {
    /// The column to compare.
    pub column: &'a str,
    /// The comparison operator.
    pub op: Op,
    /// The record's value for the column.
    pub value: &'a dyn Any,
}

impl<'a> Condition<'a> {
    /// Returns the value as a `T`, if that is its type.
    pub fn value_as<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl std::fmt::Display for Condition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.op)
    }
}
