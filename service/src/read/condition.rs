//! Search [`Conditions`] and their [`Builder`].

use std::slice;

use derive_more::{Display, Error, From};

use crate::domain::catalog::{InvalidRangeIndex, RangeCondition};
#[cfg(doc)]
use crate::domain::{catalog::Range, Catalog};

/// Column of a listing a [`Predicate`] is applied to.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Column {
    /// Chair price.
    #[display("price")]
    Price,

    /// Chair height.
    #[display("height")]
    Height,

    /// Chair width.
    #[display("width")]
    Width,

    /// Chair depth.
    #[display("depth")]
    Depth,

    /// Chair kind.
    #[display("kind")]
    Kind,

    /// Chair color.
    #[display("color")]
    Color,

    /// Comma-separated features of a listing.
    #[display("features")]
    Features,

    /// Estate door height.
    #[display("door_height")]
    DoorHeight,

    /// Estate door width.
    #[display("door_width")]
    DoorWidth,

    /// Estate rent.
    #[display("rent")]
    Rent,
}

/// Comparison a [`Predicate`] performs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `column >= value`
    AtLeast,

    /// `column < value`
    LessThan,

    /// `column = value`
    Equals,

    /// `value` is a substring of `column`.
    ///
    /// `%` and `_` inside the value keep their `LIKE` wildcard meaning.
    Contains,
}

/// Value bound to a [`Predicate`].
#[derive(Clone, Debug, Eq, From, Hash, PartialEq)]
pub enum Value {
    /// Integer value.
    Int(i64),

    /// Text value.
    Text(String),
}

/// Single `column <operator> value` clause.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Predicate {
    /// [`Column`] being filtered.
    pub column: Column,

    /// [`Operator`] applied to the [`Column`].
    pub operator: Operator,

    /// [`Value`] the [`Column`] is compared with.
    pub value: Value,
}

/// Non-empty conjunction of [`Predicate`]s.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Conditions(Vec<Predicate>);

impl Conditions {
    /// Returns the [`Predicate`]s of these [`Conditions`].
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Predicate;
    type IntoIter = slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builder of [`Conditions`] from raw request parameters.
///
/// Empty parameters contribute nothing.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    /// [`Predicate`]s collected so far.
    predicates: Vec<Predicate>,
}

impl Builder {
    /// Creates a new empty [`Builder`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds bounds of the [`Range`] selected by the raw `index` out of the
    /// provided [`RangeCondition`].
    ///
    /// # Errors
    ///
    /// With [`BuildError::InvalidRangeIndex`] if `index` doesn't select any
    /// [`Range`].
    pub fn range(
        mut self,
        column: Column,
        condition: &RangeCondition,
        index: &str,
    ) -> Result<Self, BuildError> {
        if index.is_empty() {
            return Ok(self);
        }
        let range = condition.get(index)?;
        if let Some(min) = range.lower() {
            self.push(column, Operator::AtLeast, min);
        }
        if let Some(max) = range.upper() {
            self.push(column, Operator::LessThan, max);
        }
        Ok(self)
    }

    /// Adds an equality [`Predicate`] for the provided raw `value`.
    #[must_use]
    pub fn equals(mut self, column: Column, value: &str) -> Self {
        if !value.is_empty() {
            self.push(column, Operator::Equals, value.to_owned());
        }
        self
    }

    /// Adds a containment [`Predicate`] for every token of the provided
    /// comma-separated `list`.
    #[must_use]
    pub fn contains_each(mut self, column: Column, list: &str) -> Self {
        if !list.is_empty() {
            for token in list.split(',') {
                self.push(column, Operator::Contains, token.to_owned());
            }
        }
        self
    }

    /// Finishes building [`Conditions`].
    ///
    /// # Errors
    ///
    /// With [`BuildError::NoSearchCondition`] if no [`Predicate`] was added.
    pub fn build(self) -> Result<Conditions, BuildError> {
        if self.predicates.is_empty() {
            return Err(BuildError::NoSearchCondition);
        }
        Ok(Conditions(self.predicates))
    }

    /// Pushes a new [`Predicate`].
    fn push(
        &mut self,
        column: Column,
        operator: Operator,
        value: impl Into<Value>,
    ) {
        self.predicates.push(Predicate {
            column,
            operator,
            value: value.into(),
        });
    }
}

/// Error of building [`Conditions`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, From, PartialEq)]
pub enum BuildError {
    /// Requested [`Range`] doesn't exist in the [`Catalog`].
    #[display("{_0}")]
    #[from]
    InvalidRangeIndex(InvalidRangeIndex),

    /// No search condition was provided at all.
    #[display("no search condition provided")]
    NoSearchCondition,
}

#[cfg(test)]
mod spec {
    use crate::domain::catalog::{Range, RangeCondition};

    use super::{BuildError, Builder, Column, Operator, Predicate, Value};

    fn buckets() -> RangeCondition {
        RangeCondition {
            prefix: String::new(),
            suffix: "cm".to_owned(),
            ranges: vec![
                Range {
                    id: 0,
                    min: -1,
                    max: 80,
                },
                Range {
                    id: 1,
                    min: 80,
                    max: 110,
                },
                Range {
                    id: 2,
                    min: 110,
                    max: -1,
                },
            ],
        }
    }

    fn predicate(
        column: Column,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Predicate {
        Predicate {
            column,
            operator,
            value: value.into(),
        }
    }

    #[test]
    fn emits_only_finite_bounds() {
        let conds = Builder::new()
            .range(Column::Width, &buckets(), "0")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            conds.predicates(),
            [predicate(Column::Width, Operator::LessThan, 80_i64)],
        );

        let conds = Builder::new()
            .range(Column::Width, &buckets(), "1")
            .unwrap()
            .range(Column::Height, &buckets(), "2")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            conds.predicates(),
            [
                predicate(Column::Width, Operator::AtLeast, 80_i64),
                predicate(Column::Width, Operator::LessThan, 110_i64),
                predicate(Column::Height, Operator::AtLeast, 110_i64),
            ],
        );
    }

    #[test]
    fn rejects_unknown_range_index() {
        for index in ["-1", "3", "x", "1.0"] {
            assert!(
                matches!(
                    Builder::new().range(Column::Rent, &buckets(), index),
                    Err(BuildError::InvalidRangeIndex(_)),
                ),
                "index: {index}",
            );
        }
    }

    #[test]
    fn splits_features_literally() {
        let conds = Builder::new()
            .contains_each(Column::Features, "bath,50%_off")
            .build()
            .unwrap();
        assert_eq!(
            conds.predicates(),
            [
                predicate(
                    Column::Features,
                    Operator::Contains,
                    "bath".to_owned(),
                ),
                predicate(
                    Column::Features,
                    Operator::Contains,
                    "50%_off".to_owned(),
                ),
            ],
        );
    }

    #[test]
    fn requires_at_least_one_condition() {
        let res = Builder::new()
            .range(Column::Price, &buckets(), "")
            .unwrap()
            .equals(Column::Kind, "")
            .contains_each(Column::Features, "")
            .build();
        assert_eq!(res, Err(BuildError::NoSearchCondition));

        let conds =
            Builder::new().equals(Column::Color, "red").build().unwrap();
        assert_eq!(
            conds.predicates(),
            [predicate(Column::Color, Operator::Equals, "red".to_owned())],
        );
    }
}
