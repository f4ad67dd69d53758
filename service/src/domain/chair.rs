//! [`Chair`] definitions.

use std::cmp;

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// Chair listed for sale.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chair {
    /// ID of this [`Chair`].
    pub id: Id,

    /// Name of this [`Chair`].
    pub name: String,

    /// Description of this [`Chair`].
    pub description: String,

    /// Thumbnail URL of this [`Chair`].
    pub thumbnail: String,

    /// Price of this [`Chair`].
    pub price: Price,

    /// Height of this [`Chair`].
    pub height: Length,

    /// Width of this [`Chair`].
    pub width: Length,

    /// Depth of this [`Chair`].
    pub depth: Length,

    /// Color of this [`Chair`].
    pub color: String,

    /// Comma-separated features of this [`Chair`].
    pub features: String,

    /// Kind of this [`Chair`].
    pub kind: String,

    /// Popularity score of this [`Chair`].
    pub popularity: Popularity,

    /// Number of units left in stock.
    pub stock: Stock,
}

impl Chair {
    /// Returns the [`Dimensions`] of this [`Chair`].
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }

    /// Indicates whether this [`Chair`] can still be bought.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Key sorting [`Chair`]s by popularity descending, then by ID.
    #[must_use]
    pub fn rank(&self) -> (cmp::Reverse<Popularity>, Id) {
        (cmp::Reverse(self.popularity), self.id)
    }
}

/// ID of a [`Chair`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);

/// Price of a [`Chair`].
pub type Price = i64;

/// Length of a [`Chair`] side.
pub type Length = i64;

/// Popularity score of a listing.
pub type Popularity = i64;

/// Number of [`Chair`] units in stock.
pub type Stock = i64;

/// Outer dimensions of a [`Chair`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dimensions {
    /// Width of a [`Chair`].
    pub width: Length,

    /// Height of a [`Chair`].
    pub height: Length,

    /// Depth of a [`Chair`].
    pub depth: Length,
}

impl Dimensions {
    /// Returns the smallest [`Opening`] this object can be carried through.
    ///
    /// The object is turned so that its two smallest sides face the opening.
    #[must_use]
    pub fn opening(&self) -> Opening {
        let mut sides = [self.width, self.height, self.depth];
        sides.sort_unstable();
        Opening {
            short: sides[0],
            long: sides[1],
        }
    }
}

/// Rectangular opening an object has to pass through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Opening {
    /// Shorter side.
    pub short: Length,

    /// Longer side.
    pub long: Length,
}

impl Opening {
    /// Indicates whether a door of the given size lets this [`Opening`]
    /// through, in either portrait or landscape orientation.
    #[must_use]
    pub fn passes(&self, door_width: Length, door_height: Length) -> bool {
        (door_width >= self.short && door_height >= self.long)
            || (door_width >= self.long && door_height >= self.short)
    }
}

#[cfg(test)]
mod spec {
    use super::{Dimensions, Opening};

    #[test]
    fn opening_uses_two_smallest_sides() {
        let dims = Dimensions {
            width: 5,
            height: 10,
            depth: 7,
        };
        assert_eq!(dims.opening(), Opening { short: 5, long: 7 });

        let dims = Dimensions {
            width: 30,
            height: 20,
            depth: 10,
        };
        assert_eq!(dims.opening(), Opening { short: 10, long: 20 });
    }

    #[test]
    fn opening_passes_in_either_orientation() {
        let opening = Opening { short: 5, long: 7 };

        assert!(opening.passes(6, 8));
        assert!(opening.passes(8, 6));
        assert!(opening.passes(5, 7));
        assert!(opening.passes(7, 5));
        assert!(!opening.passes(4, 4));
        assert!(!opening.passes(6, 6));
    }
}
