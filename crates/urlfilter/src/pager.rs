//! Pagination decoded from `limit` and `page` query values.
//!
//! [`Pager`] is a record with its own decoder. Flatten it into a filter to
//! give the filter pagination: its decoder runs on the whole input before
//! the filter's fields, and its `limit` and `offset` fields are tagged
//! `nowhere` so they never become filter conditions.

use crate::error::Result;
use crate::field::{DeclaredField, Shape};
use crate::traits::{DecodeFn, DecodeValues, Record};
use crate::values::Values;

/// Limits applied by a [`Pager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Limit used when none is given.
    pub default_limit: i64,
    /// Largest accepted limit.
    pub max_limit: i64,
    /// Largest accepted offset.
    pub max_offset: i64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        PagerConfig {
            default_limit: 100,
            max_limit: 1000,
            max_offset: 1_000_000,
        }
    }
}

/// Limit and offset of a paginated query.
///
/// ```
/// use urlfilter::{DecodeValues, Pager, Values};
///
/// let values: Values = [("limit", "20"), ("page", "3")].into_iter().collect();
/// let mut pager = Pager::default();
/// pager.decode_values(&values).unwrap();
///
/// assert_eq!(pager.limit(), 20);
/// assert_eq!(pager.offset(), 40);
/// assert_eq!(pager.page(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pager {
    /// Requested limit; `0` means the default, negative means unlimited.
    pub limit: i64,
    /// Requested offset.
    pub offset: i64,
    /// Limits applied to the requested values.
    pub config: PagerConfig,
}

impl Pager {
    /// Creates a pager with the given limits.
    pub fn new(config: PagerConfig) -> Self {
        Pager {
            limit: 0,
            offset: 0,
            config,
        }
    }

    /// Returns the effective limit.
    pub fn limit(&self) -> i64 {
        if self.limit < 0 {
            return self.limit;
        }
        if self.limit == 0 {
            return self.config.default_limit;
        }
        self.limit.min(self.config.max_limit)
    }

    /// Returns the effective offset.
    pub fn offset(&self) -> i64 {
        self.offset.clamp(0, self.config.max_offset.max(0))
    }

    /// Sets the offset to the start of the 1-based `page`.
    /// Saturates on overflow.
    pub fn set_page(&mut self, page: i64) {
        self.offset = page.saturating_sub(1).saturating_mul(self.limit());
    }

    /// Returns the 1-based page the offset falls on.
    pub fn page(&self) -> i64 {
        let limit = self.limit();
        if limit <= 0 {
            return 1;
        }
        self.offset() / limit + 1
    }
}

impl DecodeValues for Pager {
    fn decode_values(&mut self, values: &Values) -> Result<()> {
        self.limit = values.int("limit")?;

        let page = values.int("page")?;
        if page > 0 {
            self.set_page(page);
        }
        Ok(())
    }
}

impl Record for Pager {
    fn declared_fields() -> Vec<DeclaredField<Self>> {
        vec![
            DeclaredField::<Self>::value::<i64>(
                0,
                "limit",
                "limit,nowhere",
                Shape::Scalar,
                |p| &p.limit,
                |p| &mut p.limit,
            ),
            DeclaredField::<Self>::value::<i64>(
                1,
                "offset",
                "offset,nowhere",
                Shape::Scalar,
                |p| &p.offset,
                |p| &mut p.offset,
            ),
        ]
    }

    fn values_decoder() -> Option<DecodeFn<Self>> {
        Some(<Self as DecodeValues>::decode_values)
    }
}
