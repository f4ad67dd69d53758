//! [`Command`] for resetting the listings to their seed state.

use std::{io, path::PathBuf};

use common::operations::{Delete, Perform};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{cache, database, database::Script, Cache, Database},
    read::estate::cached,
    Service,
};

use super::Command;

/// [`Command`] for resetting the listings to their seed state.
///
/// Runs every configured seed [`Script`] in order, dropping every cached
/// search result before and after.
#[derive(Clone, Copy, Debug)]
pub struct Initialize;

impl<Db, Kv> Command<Initialize> for Service<Db, Kv>
where
    Db: Database<Perform<Script>, Err = Traced<database::Error>>,
    Kv: Cache<Delete<cached::All>, Err = Traced<cache::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Initialize) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.cache()
            .execute(Delete(cached::All))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        for path in &self.config().seed_scripts {
            let sql = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| tracerr::new!(E::Script(path.clone(), e)))?;
            log::debug!("performing seed script `{}`", path.display());
            self.database()
                .execute(Perform(Script::from(sql)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        // Searches racing with the scripts may have cached stale results.
        self.cache()
            .execute(Delete(cached::All))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`Initialize`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Cache`] error.
    #[display("`Cache` operation failed: {_0}")]
    Cache(cache::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Seed [`Script`] cannot be read.
    #[display("Failed to read `{}` seed script: {_1}", _0.display())]
    #[from(ignore)]
    Script(PathBuf, #[error(source)] io::Error),
}
