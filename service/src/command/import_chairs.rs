//! [`Command`] for importing [`Chair`]s.

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{chair, Chair},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for importing [`Chair`]s in bulk.
///
/// Either all the [`Chair`]s are imported, or none of them.
#[derive(Clone, Debug)]
pub struct ImportChairs {
    /// [`Chair`]s to be imported.
    pub chairs: Vec<Chair>,
}

impl<Db, Kv> Command<ImportChairs> for Service<Db, Kv>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Chair>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ImportChairs { chairs }: ImportChairs,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let count = chairs.len();
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for chair in chairs {
            let id = chair.id;
            tx.execute(Insert(chair))
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

        log::info!("imported {count} `Chair`s");
        Ok(())
    }
}

/// Error of [`ImportChairs`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Chair`] with the same ID is already listed.
    #[display("`Chair(id: {_0})` already exists")]
    #[from(ignore)]
    AlreadyExists(#[error(not(source))] chair::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
