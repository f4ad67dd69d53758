//! [`Recommended`] [`Query`] definition.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{chair, Chair, Estate},
    infra::{database, Database},
    read::estate::recommended,
    Service,
};

use super::super::Query;

/// Queries [`Estate`]s a [`Chair`] can be carried into.
#[derive(Clone, Copy, Debug)]
pub struct Recommended {
    /// ID of the [`Chair`] to be carried.
    pub chair: chair::Id,
}

impl Recommended {
    /// Maximum number of [`Estate`]s returned.
    pub const LIMIT: usize = 20;
}

impl<Db, Kv> Query<Recommended> for Service<Db, Kv>
where
    Db: Database<
            Select<By<Option<Chair>, chair::Id>>,
            Ok = Option<Chair>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Estate>, recommended::Selector>>,
            Ok = Vec<Estate>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Estate>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Recommended { chair }: Recommended,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let chair = self
            .database()
            .execute(Select(By::new(chair)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ChairNotExists(chair))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Select(By::new(recommended::Selector {
                opening: chair.dimensions().opening(),
                limit: Recommended::LIMIT,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`Recommended`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Chair`] to be carried doesn't exist.
    #[display("`Chair(id: {_0})` doesn't exist")]
    #[from(ignore)]
    ChairNotExists(#[error(not(source))] chair::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use crate::{domain::Estate, fixture, Query as _};

    use super::{ExecutionError, Recommended};

    fn door(id: i64, popularity: i64, width: i64, height: i64) -> Estate {
        let mut e = fixture::estate(id, popularity);
        e.door_width = width;
        e.door_height = height;
        e
    }

    #[tokio::test]
    async fn recommends_estates_the_chair_fits_into() {
        let mut chair = fixture::chair(1, 0);
        chair.width = 5;
        chair.height = 10;
        chair.depth = 7;
        let (svc, _bg) = fixture::service(
            [chair],
            [
                door(1, 0, 6, 8),
                door(2, 0, 4, 4),
                door(3, 9, 8, 6),
                door(4, 0, 6, 6),
            ],
        );

        let found = svc
            .execute(Recommended {
                chair: 1_i64.into(),
            })
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.id.into()).collect();
        assert_eq!(ids, [3, 1]);
    }

    #[tokio::test]
    async fn caps_number_of_recommendations() {
        let (svc, _bg) = fixture::service(
            [fixture::chair(1, 0)],
            (1..=30).map(|id| fixture::estate(id, 0)),
        );

        let found = svc
            .execute(Recommended {
                chair: 1_i64.into(),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), Recommended::LIMIT);
    }

    #[tokio::test]
    async fn fails_on_unknown_chair() {
        let (svc, _bg) = fixture::service([], [fixture::estate(1, 0)]);

        let err = svc
            .execute(Recommended {
                chair: 1_i64.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ChairNotExists(_)));
    }
}
