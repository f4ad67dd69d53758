//! [`FillEstateIds`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Select, Start, Update};
use derive_more::{Display, Error as StdError, From};
use tokio::task;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Estate;
use crate::{
    infra::{cache, database, Cache, Database},
    read::{
        estate::{cached, search},
        Conditions,
    },
    FillJobs, Service,
};

use super::Task;

/// Configuration for [`FillEstateIds`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Time a single [`Job`] is allowed to take.
    pub timeout: time::Duration,
}

/// Request to cache the [`Estate`] ID list of a search.
#[derive(Clone, Debug)]
pub struct Job {
    /// [`search::Fingerprint`] to cache the list under.
    pub fingerprint: search::Fingerprint,

    /// [`Conditions`] of the search.
    pub conditions: Conditions,
}

/// [`Task`] for filling the [`Cache`] with [`Estate`] ID lists.
#[derive(Clone, Copy, Debug)]
pub struct FillEstateIds<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Kv> Task<Start<By<FillEstateIds<Self>, FillJobs>>> for Service<Db, Kv>
where
    FillEstateIds<Service<Db, Kv>>:
        Task<Perform<Job>, Ok = (), Err: Error> + Clone + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<FillEstateIds<Self>, FillJobs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut jobs = by.into_inner();
        let task = FillEstateIds {
            config: self.config().fill_estate_ids,
            service: self.clone(),
        };

        while let Some(job) = jobs.recv().await {
            let task = task.clone();
            drop(task::spawn_local(async move {
                let fingerprint = job.fingerprint.clone();
                match tokio::time::timeout(
                    task.config.timeout,
                    task.execute(Perform(job)),
                )
                .await
                {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => log::error!(
                        "`task::FillEstateIds` failed for `{fingerprint}`: {e}",
                    ),
                    Err(_) => log::warn!(
                        "`task::FillEstateIds` timed out for `{fingerprint}`",
                    ),
                }
            }));
        }
        Ok(())
    }
}

impl<Db, Kv> Task<Perform<Job>> for FillEstateIds<Service<Db, Kv>>
where
    Db: Database<
        Select<By<search::Ids, Conditions>>,
        Ok = search::Ids,
        Err = Traced<database::Error>,
    >,
    Kv: Cache<
        Update<cached::Entry>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Perform(job): Perform<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Job {
            fingerprint,
            conditions,
        } = job;

        let search::Ids(ids) = self
            .service
            .database()
            .execute(Select(By::new(conditions)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if ids.is_empty() {
            // Empty list cannot be told apart from a missing one.
            log::debug!("nothing to cache for `{fingerprint}`");
            return Ok(());
        }

        log::debug!("caching {} IDs for `{fingerprint}`", ids.len());
        self.service
            .cache()
            .execute(Update(cached::Entry { fingerprint, ids }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`FillEstateIds`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Cache`] error.
    #[display("`Cache` operation failed: {_0}")]
    Cache(cache::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
