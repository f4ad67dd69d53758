//! [`Estate`]-related read definitions.

use derive_more::Deref;

use crate::domain::Estate;

/// [`Estate`]s located inside a bounding box, in listing order.
#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct InBoundingBox(pub Vec<Estate>);

/// Indicator whether an [`Estate`] is located inside a polygon.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct IsInPolygon(pub bool);

pub mod search {
    //! [`Estate`] search definitions.

    use common::define_pagination;
    use derive_more::{Deref, Display, From, Into};

    use crate::{
        domain::{catalog::EstateConditions, estate, Estate},
        read::condition::{BuildError, Builder, Column, Conditions},
    };

    define_pagination!(Conditions);

    /// Raw [`Estate`] search parameters, as requested.
    #[derive(Clone, Debug, Default)]
    pub struct Params {
        /// Index of the door height range.
        pub door_height_range_id: String,

        /// Index of the door width range.
        pub door_width_range_id: String,

        /// Index of the rent range.
        pub rent_range_id: String,

        /// Comma-separated features to contain.
        pub features: String,
    }

    impl Params {
        /// Builds [`Conditions`] of these [`Params`] against the provided
        /// [`EstateConditions`].
        ///
        /// # Errors
        ///
        /// If any range index is unknown, or no condition is provided at all.
        pub fn conditions(
            &self,
            catalog: &EstateConditions,
        ) -> Result<Conditions, BuildError> {
            Builder::new()
                .range(
                    Column::DoorHeight,
                    &catalog.door_height,
                    &self.door_height_range_id,
                )?
                .range(
                    Column::DoorWidth,
                    &catalog.door_width,
                    &self.door_width_range_id,
                )?
                .range(Column::Rent, &catalog.rent, &self.rent_range_id)?
                .contains_each(Column::Features, &self.features)
                .build()
        }

        /// Returns the [`Fingerprint`] of these [`Params`].
        ///
        /// Only meaningful for [`Params`] whose [`Conditions`] were built
        /// successfully, so the range indices contain no `_`.
        #[must_use]
        pub fn fingerprint(&self) -> Fingerprint {
            Fingerprint(
                [
                    self.door_height_range_id.as_str(),
                    self.door_width_range_id.as_str(),
                    self.rent_range_id.as_str(),
                    self.features.as_str(),
                ]
                .join("_"),
            )
        }
    }

    /// Key identifying equivalent [`Estate`] searches.
    #[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
    pub struct Fingerprint(String);

    impl Fingerprint {
        /// Returns the string representation of this [`Fingerprint`].
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    /// Total count of [`Estate`]s matching [`Conditions`].
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i64);

    /// All IDs of [`Estate`]s matching [`Conditions`], in listing order.
    #[derive(Clone, Debug, Default, Deref, Eq, From, PartialEq)]
    pub struct Ids(pub Vec<estate::Id>);

    /// Page of found [`Estate`]s.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Page {
        /// Total count of matching [`Estate`]s.
        pub count: i64,

        /// [`Estate`]s of this [`Page`], in listing order.
        pub estates: Vec<Estate>,
    }
}

pub mod cached {
    //! Cached [`Estate`] ID lists definitions.

    use crate::domain::estate;
    #[cfg(doc)]
    use crate::domain::Estate;

    use super::search::{Arguments, Fingerprint};

    /// Selector of a window of a cached ID list.
    #[derive(Clone, Debug)]
    pub struct Selector {
        /// [`Fingerprint`] the list is cached under.
        pub fingerprint: Fingerprint,

        /// Window of the list to read.
        pub arguments: Arguments,
    }

    /// Window of a cached ID list.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Slice {
        /// IDs inside the window, in listing order.
        pub ids: Vec<estate::Id>,

        /// Length of the whole cached list.
        pub total: usize,
    }

    /// Full ID list to be cached.
    #[derive(Clone, Debug)]
    pub struct Entry {
        /// [`Fingerprint`] to cache the list under.
        pub fingerprint: Fingerprint,

        /// IDs of the matching [`Estate`]s, in listing order.
        pub ids: Vec<estate::Id>,
    }

    /// Every cached ID list.
    #[derive(Clone, Copy, Debug)]
    pub struct All;
}

pub mod recommended {
    //! [`Estate`] recommendation definitions.

    use crate::domain::chair::Opening;
    #[cfg(doc)]
    use crate::domain::Estate;

    /// Selector of [`Estate`]s whose door lets an [`Opening`] through.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Selector {
        /// [`Opening`] to be let through.
        pub opening: Opening,

        /// Maximum number of [`Estate`]s to select.
        pub limit: usize,
    }
}
