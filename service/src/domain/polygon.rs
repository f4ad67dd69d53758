//! [`Polygon`] definitions.

use std::{fmt, iter, sync::Arc};

use serde::{Deserialize, Serialize};

/// Geographic point.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coordinate {
    /// Latitude of this [`Coordinate`].
    pub latitude: f64,

    /// Longitude of this [`Coordinate`].
    pub longitude: f64,
}

/// Simple polygon drawn on a map, not necessarily closed.
///
/// Cloning is cheap, vertices are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon(Arc<[Coordinate]>);

impl Polygon {
    /// Creates a new [`Polygon`] out of the provided vertices.
    ///
    /// Returns [`None`] if there are no vertices.
    #[must_use]
    pub fn new(vertices: impl Into<Vec<Coordinate>>) -> Option<Self> {
        let vertices = vertices.into();
        (!vertices.is_empty()).then(|| Self(vertices.into()))
    }

    /// Returns the vertices of this [`Polygon`].
    #[must_use]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.0
    }

    /// Returns the axis-aligned [`BoundingBox`] of this [`Polygon`].
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let first = self.0[0];
        self.0.iter().skip(1).fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |BoundingBox { min, max }, c| BoundingBox {
                min: Coordinate {
                    latitude: min.latitude.min(c.latitude),
                    longitude: min.longitude.min(c.longitude),
                },
                max: Coordinate {
                    latitude: max.latitude.max(c.latitude),
                    longitude: max.longitude.max(c.longitude),
                },
            },
        )
    }

    /// Indicates whether the provided point lies strictly inside this
    /// [`Polygon`], using the even-odd rule.
    ///
    /// Points on an edge or a vertex are outside, matching the Postgres
    /// containment check.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        let (x, y) = (point.latitude, point.longitude);
        let mut inside = false;
        for (prev, curr) in self.edges() {
            if is_on_segment(point, prev, curr) {
                return false;
            }
            let (xi, yi) = (curr.latitude, curr.longitude);
            let (xj, yj) = (prev.latitude, prev.longitude);
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
        }
        inside
    }

    /// Returns the edges of this [`Polygon`], the closing one included.
    fn edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        let last = self.0[self.0.len() - 1];
        iter::once(last)
            .chain(self.0.iter().copied())
            .zip(self.0.iter().copied())
    }
}

/// Indicates whether the `point` lies on the segment between `a` and `b`.
fn is_on_segment(point: Coordinate, a: Coordinate, b: Coordinate) -> bool {
    let cross = (b.latitude - a.latitude) * (point.longitude - a.longitude)
        - (b.longitude - a.longitude) * (point.latitude - a.latitude);
    cross.abs() <= f64::EPSILON
        && (a.latitude.min(b.latitude)..=a.latitude.max(b.latitude))
            .contains(&point.latitude)
        && (a.longitude.min(b.longitude)..=a.longitude.max(b.longitude))
            .contains(&point.longitude)
}

/// Formats as a `((lat,lon),...)` path, the Postgres `POLYGON` literal.
impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "({},{})", c.latitude, c.longitude)?;
        }
        f.write_str(")")
    }
}

/// Axis-aligned box around a [`Polygon`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Corner with both the smallest latitude and longitude.
    pub min: Coordinate,

    /// Corner with both the largest latitude and longitude.
    pub max: Coordinate,
}

impl BoundingBox {
    /// Indicates whether the provided point lies inside this [`BoundingBox`],
    /// edges included.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min.latitude..=self.max.latitude).contains(&point.latitude)
            && (self.min.longitude..=self.max.longitude)
                .contains(&point.longitude)
    }
}
