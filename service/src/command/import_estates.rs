//! [`Command`] for importing [`Estate`]s.

use common::operations::{Commit, Delete, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{estate, Estate},
    infra::{cache, database, Cache, Database},
    read::estate::cached,
    Service,
};

use super::Command;

/// [`Command`] for importing [`Estate`]s in bulk.
///
/// Either all the [`Estate`]s are imported, or none of them. Every cached
/// search result is dropped afterwards.
#[derive(Clone, Debug)]
pub struct ImportEstates {
    /// [`Estate`]s to be imported.
    pub estates: Vec<Estate>,
}

impl<Db, Kv> Command<ImportEstates> for Service<Db, Kv>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Estate>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Kv: Cache<Delete<cached::All>, Err = Traced<cache::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ImportEstates { estates }: ImportEstates,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let count = estates.len();
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for estate in estates {
            let id = estate.id;
            tx.execute(Insert(estate))
                .await
                .map_err(|e| {
                    if e.as_ref().is_duplicate_id() {
                        tracerr::new!(E::AlreadyExists(id))
                    } else {
                        tracerr::map_from(e)
                    }
                })
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        log::info!("imported {count} `Estate`s");

        // Import is durable already, so stale search results are tolerated.
        if let Err(e) = self.cache().execute(Delete(cached::All)).await {
            log::error!(
                "failed to invalidate cached `Estate` searches: {e}\n{}",
                e.trace(),
            );
        }
        Ok(())
    }
}

/// Error of [`ImportEstates`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Estate`] with the same ID is already listed.
    #[display("`Estate(id: {_0})` already exists")]
    #[from(ignore)]
    AlreadyExists(#[error(not(source))] estate::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
