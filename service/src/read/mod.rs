//! Read entities definitions.

pub mod chair;
pub mod condition;
pub mod estate;

pub use self::condition::Conditions;

/// Selector of the cheapest listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cheapest {
    /// Maximum number of listings to select.
    pub limit: usize,
}

impl Cheapest {
    /// [`Cheapest`] selector of the low-priced listings.
    pub const LOW_PRICED: Self = Self { limit: 20 };
}
