//! Abstractions for offset-based pagination.

use std::ops::Range;

use derive_more::{Display, Error as StdError};

/// Pagination arguments: a window of `limit` items starting at `offset`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// Maximum number of items to return.
    limit: usize,

    /// Number of items to skip.
    offset: usize,
}

impl Arguments {
    /// Creates [`Arguments`] from a zero-based `page` number and the
    /// `per_page` size.
    ///
    /// # Errors
    ///
    /// If `page * per_page` overflows.
    pub fn from_page(page: usize, per_page: usize) -> Result<Self, Error> {
        let offset = page.checked_mul(per_page).ok_or(Error::Overflow)?;
        Ok(Self {
            limit: per_page,
            offset,
        })
    }

    /// Parses [`Arguments`] from raw `page` and `per_page` request values.
    ///
    /// # Errors
    ///
    /// If any of the values is not a non-negative integer, or the resulting
    /// offset overflows.
    pub fn parse(page: &str, per_page: &str) -> Result<Self, Error> {
        let page = page.parse().map_err(|_| Error::InvalidPage)?;
        let per_page = per_page.parse().map_err(|_| Error::InvalidPerPage)?;
        Self::from_page(page, per_page)
    }

    /// Returns the maximum number of items requested by these [`Arguments`].
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of items skipped by these [`Arguments`].
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the window of these [`Arguments`] clamped to `len` items.
    #[must_use]
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = self.offset.saturating_add(self.limit).min(len);
        start..end
    }

    /// Returns the part of `items` selected by these [`Arguments`].
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.window(items.len())]
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter being applied before paginating.
    pub filter: F,
}

/// Error of parsing pagination [`Arguments`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// `page` is not a non-negative integer.
    #[display("`page` must be a non-negative integer")]
    InvalidPage,

    /// `perPage` is not a non-negative integer.
    #[display("`perPage` must be a non-negative integer")]
    InvalidPerPage,

    /// Requested offset is too large.
    #[display("requested page is out of range")]
    Overflow,
}

/// Defines pagination types for the provided filter.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($filter:ty) => {
        #[doc = "Arguments for selecting a page."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "Page selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}
