//! [`Query`] collection related to the multiple [`Chair`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::Chair,
    infra::{database, Database},
    read::{self, chair::search, condition::BuildError, Conditions},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries the cheapest [`Chair`]s.
pub type Cheapest = DatabaseQuery<By<Vec<Chair>, read::Cheapest>>;

/// Queries a [`search::Page`] of [`Chair`]s matching [`search::Params`].
#[derive(Clone, Debug)]
pub struct Search {
    /// Raw [`search::Params`] to build [`Conditions`] from.
    pub params: search::Params,

    /// Page to be returned.
    pub arguments: search::Arguments,
}

impl<Db, Kv> Query<Search> for Service<Db, Kv>
where
    Db: Database<
            Select<By<search::TotalCount, Conditions>>,
            Ok = search::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Chair>, search::Selector>>,
            Ok = Vec<Chair>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = search::Page;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Search) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Search { params, arguments } = query;

        let conditions = params
            .conditions(&self.config().catalog.chair)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let count = self
            .database()
            .execute(Select(By::<search::TotalCount, _>::new(
                conditions.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let chairs = self
            .database()
            .execute(Select(By::new(search::Selector {
                arguments,
                filter: conditions,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(search::Page {
            count: count.into(),
            chairs,
        })
    }
}

/// Error of [`Search`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Search parameters cannot be turned into [`Conditions`].
    #[display("Invalid search condition: {_0}")]
    InvalidCondition(BuildError),
}
