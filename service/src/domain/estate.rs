//! [`Estate`] definitions.

use std::cmp;

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

pub use super::chair::Popularity;
use super::polygon::Coordinate;

/// Estate listed for rent.
#[derive(Clone, Debug, PartialEq)]
pub struct Estate {
    /// ID of this [`Estate`].
    pub id: Id,

    /// Name of this [`Estate`].
    pub name: String,

    /// Description of this [`Estate`].
    pub description: String,

    /// Thumbnail URL of this [`Estate`].
    pub thumbnail: String,

    /// Postal address of this [`Estate`].
    pub address: String,

    /// Latitude of this [`Estate`] location.
    pub latitude: f64,

    /// Longitude of this [`Estate`] location.
    pub longitude: f64,

    /// Monthly rent of this [`Estate`].
    pub rent: Rent,

    /// Height of the entrance door.
    pub door_height: DoorLength,

    /// Width of the entrance door.
    pub door_width: DoorLength,

    /// Comma-separated features of this [`Estate`].
    pub features: String,

    /// Popularity score of this [`Estate`].
    pub popularity: Popularity,
}

impl Estate {
    /// Returns the location of this [`Estate`].
    #[must_use]
    pub fn location(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Key sorting [`Estate`]s by popularity descending, then by ID.
    ///
    /// This is the order every [`Estate`] list is served in.
    #[must_use]
    pub fn rank(&self) -> (cmp::Reverse<Popularity>, Id) {
        (cmp::Reverse(self.popularity), self.id)
    }
}

/// ID of an [`Estate`].
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

/// Monthly rent of an [`Estate`].
pub type Rent = i64;

/// Length of an [`Estate`] door side.
pub type DoorLength = i64;
