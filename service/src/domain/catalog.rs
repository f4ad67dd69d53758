//! Range [`Catalog`] definitions.
//!
//! The catalog is loaded once at startup and never changes afterwards.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Value marking an unbounded side of a [`Range`].
pub const UNBOUNDED: i64 = -1;

/// Static lookup of the search conditions offered to clients.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Catalog {
    /// Search conditions for chairs.
    pub chair: ChairConditions,

    /// Search conditions for estates.
    pub estate: EstateConditions,
}

/// Search conditions available for chairs.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChairConditions {
    /// Width buckets.
    pub width: RangeCondition,

    /// Height buckets.
    pub height: RangeCondition,

    /// Depth buckets.
    pub depth: RangeCondition,

    /// Price buckets.
    pub price: RangeCondition,

    /// Known colors.
    pub color: ListCondition,

    /// Known features.
    pub feature: ListCondition,

    /// Known kinds.
    pub kind: ListCondition,
}

/// Search conditions available for estates.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateConditions {
    /// Door width buckets.
    pub door_width: RangeCondition,

    /// Door height buckets.
    pub door_height: RangeCondition,

    /// Rent buckets.
    pub rent: RangeCondition,

    /// Known features.
    pub feature: ListCondition,
}

/// Ordered set of numeric buckets selectable by index.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RangeCondition {
    /// Display prefix of the bucket values.
    #[serde(default)]
    pub prefix: String,

    /// Display suffix of the bucket values.
    #[serde(default)]
    pub suffix: String,

    /// Buckets of this condition.
    pub ranges: Vec<Range>,
}

impl RangeCondition {
    /// Looks up the [`Range`] selected by the raw `index` request value.
    ///
    /// # Errors
    ///
    /// If `index` is not a number, or it is out of bounds.
    pub fn get(&self, index: &str) -> Result<&Range, InvalidRangeIndex> {
        index
            .parse::<usize>()
            .ok()
            .and_then(|i| self.ranges.get(i))
            .ok_or(InvalidRangeIndex)
    }
}

/// Numeric bucket `[min, max)`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Range {
    /// Position of this [`Range`] in its [`RangeCondition`].
    pub id: i64,

    /// Inclusive lower bound, or [`UNBOUNDED`].
    pub min: i64,

    /// Exclusive upper bound, or [`UNBOUNDED`].
    pub max: i64,
}

impl Range {
    /// Returns the inclusive lower bound, if any.
    #[must_use]
    pub fn lower(&self) -> Option<i64> {
        (self.min != UNBOUNDED).then_some(self.min)
    }

    /// Returns the exclusive upper bound, if any.
    #[must_use]
    pub fn upper(&self) -> Option<i64> {
        (self.max != UNBOUNDED).then_some(self.max)
    }
}

/// Set of known categorical values.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ListCondition {
    /// Known values.
    pub list: Vec<String>,
}

/// Requested [`Range`] index is not a number or out of bounds.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("unknown range index")]
pub struct InvalidRangeIndex;

#[cfg(test)]
mod spec {
    use super::{InvalidRangeIndex, Range, RangeCondition};

    pub(crate) fn condition(bounds: &[(i64, i64)]) -> RangeCondition {
        RangeCondition {
            prefix: String::new(),
            suffix: "cm".to_owned(),
            ranges: bounds
                .iter()
                .zip(0..)
                .map(|(&(min, max), id)| Range { id, min, max })
                .collect(),
        }
    }

    #[test]
    fn looks_up_by_index() {
        let cond = condition(&[(-1, 80), (80, 110), (110, -1)]);

        assert_eq!(cond.get("0").unwrap().max, 80);
        assert_eq!(cond.get("2").unwrap().min, 110);

        assert_eq!(cond.get("3"), Err(InvalidRangeIndex));
        assert_eq!(cond.get("-1"), Err(InvalidRangeIndex));
        assert_eq!(cond.get("one"), Err(InvalidRangeIndex));
        assert_eq!(cond.get(""), Err(InvalidRangeIndex));
    }

    #[test]
    fn treats_minus_one_as_unbounded() {
        let cond = condition(&[(-1, 80), (110, -1)]);

        let first = cond.get("0").unwrap();
        assert_eq!(first.lower(), None);
        assert_eq!(first.upper(), Some(80));

        let last = cond.get("1").unwrap();
        assert_eq!(last.lower(), Some(110));
        assert_eq!(last.upper(), None);
    }
}
