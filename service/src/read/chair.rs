//! [`Chair`]-related read definitions.

#[cfg(doc)]
use crate::domain::Chair;

pub mod search {
    //! [`Chair`] search definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::{
        domain::{catalog::ChairConditions, Chair},
        read::condition::{BuildError, Builder, Column, Conditions},
    };

    define_pagination!(Conditions);

    /// Raw [`Chair`] search parameters, as requested.
    #[derive(Clone, Debug, Default)]
    pub struct Params {
        /// Index of the price range.
        pub price_range_id: String,

        /// Index of the height range.
        pub height_range_id: String,

        /// Index of the width range.
        pub width_range_id: String,

        /// Index of the depth range.
        pub depth_range_id: String,

        /// Exact kind.
        pub kind: String,

        /// Exact color.
        pub color: String,

        /// Comma-separated features to contain.
        pub features: String,
    }

    impl Params {
        /// Builds [`Conditions`] of these [`Params`] against the provided
        /// [`ChairConditions`].
        ///
        /// # Errors
        ///
        /// If any range index is unknown, or no condition is provided at all.
        pub fn conditions(
            &self,
            catalog: &ChairConditions,
        ) -> Result<Conditions, BuildError> {
            Builder::new()
                .range(Column::Price, &catalog.price, &self.price_range_id)?
                .range(Column::Height, &catalog.height, &self.height_range_id)?
                .range(Column::Width, &catalog.width, &self.width_range_id)?
                .range(Column::Depth, &catalog.depth, &self.depth_range_id)?
                .equals(Column::Kind, &self.kind)
                .equals(Column::Color, &self.color)
                .contains_each(Column::Features, &self.features)
                .build()
        }
    }

    /// Total count of [`Chair`]s matching [`Conditions`].
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i64);

    /// Page of found [`Chair`]s.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Page {
        /// Total count of matching [`Chair`]s.
        pub count: i64,

        /// [`Chair`]s of this [`Page`], in listing order.
        pub chairs: Vec<Chair>,
    }
}
