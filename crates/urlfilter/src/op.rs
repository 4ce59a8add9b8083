//! Comparison operators and the column/operator splitter.
//!
//! Every field of a record maps to a column and an [`Op`]. The operator is
//! encoded as a suffix of the field name (`age_gte`, `name_ieq`) and recovered
//! with [`split_column_operator`].

use serde::{Deserialize, Serialize};

/// Separator used when deriving a column from a field name.
pub const FIELD_SEPARATOR: &str = "_";

/// Separator used when looking up a field by an external key.
///
/// It is wider than [`FIELD_SEPARATOR`] so that query keys like
/// `created_at__gte` can address an operator variant of a column whose
/// name already contains underscores.
pub const LOOKUP_SEPARATOR: &str = "__";

/// Comparison operator attached to a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Equal. The default when no suffix is present.
    #[default]
    Eq,
    /// Not equal (`neq` or `exclude`).
    #[serde(rename = "neq", alias = "exclude")]
    NotEq,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Case-insensitive equality.
    IEq,
    /// Pattern match.
    Match,
}

impl Op {
    /// Parses an operator suffix.
    ///
    /// The empty suffix means [`Op::Eq`]. Returns `None` for anything outside
    /// the vocabulary.
    pub fn from_suffix(suffix: &str) -> Option<Op> {
        match suffix {
            "eq" | "" => Some(Op::Eq),
            "neq" | "exclude" => Some(Op::NotEq),
            "gt" => Some(Op::Gt),
            "gte" => Some(Op::Gte),
            "lt" => Some(Op::Lt),
            "lte" => Some(Op::Lte),
            "ieq" => Some(Op::IEq),
            "match" => Some(Op::Match),
            _ => None,
        }
    }

    /// Returns the canonical suffix of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::NotEq => "neq",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::IEq => "ieq",
            Op::Match => "match",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Splits `name` into a column and an operator around the last `sep`.
///
/// Without a separator the whole name is the column and the operator is
/// [`Op::Eq`]. An unknown suffix undoes the split: the entire input becomes
/// the column, again with [`Op::Eq`].
///
/// ```
/// use urlfilter::{split_column_operator, Op};
///
/// assert_eq!(split_column_operator("age_gte", "_"), ("age", Op::Gte));
/// assert_eq!(split_column_operator("name", "_"), ("name", Op::Eq));
/// assert_eq!(split_column_operator("name_bogus", "_"), ("name_bogus", Op::Eq));
/// ```
pub fn split_column_operator<'a>(name: &'a str, sep: &str) -> (&'a str, Op) {
    let Some(ind) = name.rfind(sep) else {
        return (name, Op::Eq);
    };

    let column = &name[..ind];
    let suffix = &name[ind + sep.len()..];

    match Op::from_suffix(suffix) {
        Some(op) => (column, op),
        None => (name, Op::Eq),
    }
}
