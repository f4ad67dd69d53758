//! [`InPolygon`] [`Query`] definition.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{estate, polygon::BoundingBox, Coordinate, Estate, Polygon},
    infra::{database, Database},
    read,
    Service,
};

use super::super::Query;

/// Queries [`Estate`]s located inside a [`Polygon`] drawn on a map.
#[derive(Clone, Debug)]
pub struct InPolygon {
    /// Vertices of the [`Polygon`].
    pub vertices: Vec<Coordinate>,
}

impl InPolygon {
    /// Maximum number of [`Estate`]s returned.
    pub const LIMIT: usize = 50;
}

impl<Db, Kv> Query<InPolygon> for Service<Db, Kv>
where
    Db: Database<
            Select<By<read::estate::InBoundingBox, BoundingBox>>,
            Ok = read::estate::InBoundingBox,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::estate::IsInPolygon, (estate::Id, Polygon)>>,
            Ok = read::estate::IsInPolygon,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Estate>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        InPolygon { vertices }: InPolygon,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let polygon = Polygon::new(vertices)
            .ok_or(E::EmptyPolygon)
            .map_err(tracerr::wrap!())?;

        let read::estate::InBoundingBox(candidates) = self
            .database()
            .execute(Select(By::new(polygon.bounding_box())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut found = Vec::new();
        for estate in candidates {
            let inside = self
                .database()
                .execute(Select(By::new((estate.id, polygon.clone()))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if *inside {
                found.push(estate);
                if found.len() >= InPolygon::LIMIT {
                    break;
                }
            }
        }
        Ok(found)
    }
}

/// Error of [`InPolygon`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Polygon`] has no vertices.
    #[display("`Polygon` has no vertices")]
    #[from(ignore)]
    EmptyPolygon,
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{Coordinate, Estate},
        fixture, Query as _,
    };

    use super::{ExecutionError, InPolygon};

    fn c(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    fn square() -> Vec<Coordinate> {
        vec![c(0.0, 0.0), c(2.0, 0.0), c(2.0, 2.0), c(0.0, 2.0)]
    }

    fn located(id: i64, popularity: i64, at: Coordinate) -> Estate {
        let mut e = fixture::estate(id, popularity);
        e.latitude = at.latitude;
        e.longitude = at.longitude;
        e
    }

    #[tokio::test]
    async fn finds_estates_inside_polygon() {
        let (svc, _bg) = fixture::service(
            [],
            [
                located(1, 0, c(1.0, 1.0)),
                located(2, 0, c(3.0, 3.0)),
                located(3, 5, c(0.5, 1.5)),
            ],
        );

        let found = svc
            .execute(InPolygon {
                vertices: square(),
            })
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.id.into()).collect();
        assert_eq!(ids, [3, 1]);
    }

    #[tokio::test]
    async fn skips_estates_only_inside_bounding_box() {
        let (svc, _bg) = fixture::service(
            [],
            [located(1, 0, c(1.0, 1.0)), located(2, 0, c(3.0, 3.0))],
        );

        let found = svc
            .execute(InPolygon {
                vertices: vec![c(0.0, 0.0), c(4.0, 0.0), c(0.0, 4.0)],
            })
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.id.into()).collect();
        assert_eq!(ids, [1]);
    }

    #[tokio::test]
    async fn excludes_estates_on_boundary() {
        let (svc, _bg) = fixture::service(
            [],
            [
                located(1, 0, c(0.0, 1.0)),
                located(2, 0, c(2.0, 1.0)),
                located(3, 0, c(1.0, 0.0)),
                located(4, 0, c(1.0, 2.0)),
                located(5, 0, c(2.0, 2.0)),
                located(6, 0, c(1.5, 1.5)),
            ],
        );

        let found = svc
            .execute(InPolygon {
                vertices: square(),
            })
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.id.into()).collect();
        assert_eq!(ids, [6]);
    }

    #[tokio::test]
    async fn caps_number_of_matches() {
        let (svc, _bg) = fixture::service(
            [],
            (1..=60).map(|id| located(id, id, c(1.0, 1.0))),
        );

        let found = svc
            .execute(InPolygon {
                vertices: square(),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), InPolygon::LIMIT);
        assert_eq!(found[0].id, 60_i64.into());
    }

    #[tokio::test]
    async fn rejects_empty_polygon() {
        let (svc, _bg) = fixture::service([], []);

        let err = svc
            .execute(InPolygon { vertices: vec![] })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::EmptyPolygon));
    }
}
