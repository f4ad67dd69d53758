//! [`Search`] [`Query`] definition.

use std::collections::HashMap;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{estate, Estate},
    infra::{cache, database, Cache, Database},
    read::{
        condition::BuildError,
        estate::{cached, search},
        Conditions,
    },
    task::fill_estate_ids::Job,
    Service,
};

use super::super::Query;

/// Queries a [`search::Page`] of [`Estate`]s matching [`search::Params`].
///
/// The full list of matching [`estate::Id`]s is kept in the [`Cache`] under
/// the [`search::Fingerprint`] of the [`search::Params`]. Once cached, only
/// the requested page of [`Estate`]s is read from the [`Database`].
/// Otherwise, the page is selected directly and the list is cached in
/// background.
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
            Select<By<Vec<Estate>, search::Selector>>,
            Ok = Vec<Estate>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<estate::Id, Estate>, Vec<estate::Id>>>,
            Ok = HashMap<estate::Id, Estate>,
            Err = Traced<database::Error>,
        >,
    Kv: Cache<
        Select<By<Option<cached::Slice>, cached::Selector>>,
        Ok = Option<cached::Slice>,
        Err = Traced<cache::Error>,
    >,
{
    type Ok = search::Page;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Search) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Search { params, arguments } = query;

        let conditions = params
            .conditions(&self.config().catalog.estate)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let fingerprint = params.fingerprint();

        let slice = self
            .cache()
            .execute(Select(By::new(cached::Selector {
                fingerprint: fingerprint.clone(),
                arguments,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(cached::Slice { ids, total }) = slice {
            let mut found = self
                .database()
                .execute(Select(By::<HashMap<_, _>, _>::new(ids.clone())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let mut estates: Vec<_> =
                ids.iter().filter_map(|id| found.remove(id)).collect();
            estates.sort_by_key(Estate::rank);

            return Ok(search::Page {
                count: i64::try_from(total).unwrap_or(i64::MAX),
                estates,
            });
        }

        let job = Job {
            fingerprint,
            conditions: conditions.clone(),
        };
        if !self.enqueue_fill(job) {
            log::warn!("`task::FillEstateIds` is gone, search stays uncached");
        }

        let count = self
            .database()
            .execute(Select(By::<search::TotalCount, _>::new(
                conditions.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let estates = self
            .database()
            .execute(Select(By::new(search::Selector {
                arguments,
                filter: conditions,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(search::Page {
            count: count.into(),
            estates,
        })
    }
}

/// Error of [`Search`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Cache`] error.
    #[display("`Cache` operation failed: {_0}")]
    Cache(cache::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Search parameters cannot be turned into [`Conditions`].
    #[display("Invalid search condition: {_0}")]
    InvalidCondition(BuildError),
}
