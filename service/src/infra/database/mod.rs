//! [`Database`]-related implementations.

#[cfg(test)]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// Raw SQL script to be [`Perform`]ed as a whole.
///
/// [`Perform`]: common::operations::Perform
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
pub struct Script(String);

impl Script {
    /// Returns the SQL text of this [`Script`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    #[cfg(test)]
    /// In-memory [`Database`] error.
    Memory(memory::Error),
}

impl Error {
    /// Checks if the error is a violation of a listing ID uniqueness.
    #[must_use]
    pub fn is_duplicate_id(&self) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_unique_violation(None),
            #[cfg(test)]
            Self::Memory(e) => matches!(e, memory::Error::DuplicateId(_)),
        }
    }
}
