//! [`Tx`] client definitions.

use std::{mem, sync::Arc};

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;
use tracing as log;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::NonTx;

/// Transactional Postgres database client.
///
/// The transaction begins lazily, on the first statement, so a [`Tx`] which
/// runs nothing never takes a [`Connection`] from the [`connection::Pool`].
/// Dropping a [`Tx`] without committing rolls it back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to take a [`Connection`] from.
    pool: connection::Pool,

    /// [`State`] of the transaction.
    state: Arc<RwLock<State>>,
}

/// State of a [`Tx`] client.
#[derive(Debug)]
enum State {
    /// Nothing has been run yet.
    Idle,

    /// Transaction is running.
    Active(connection::Tx),

    /// Transaction has been committed.
    Finished,
}

impl Tx {
    /// Creates a new [`Tx`] client sharing [`connection::Pool`] with the
    /// provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: &NonTx) -> Self {
        Self {
            pool: client.pool().clone(),
            state: Arc::new(RwLock::new(State::Idle)),
        }
    }

    /// Returns the running transaction, beginning it if necessary.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let state = self.state.read().await;
        if let Ok(tx) = RwLockReadGuard::try_map(state, State::active) {
            return Ok(tx);
        }

        let mut state = self.state.write().await;
        if matches!(*state, State::Idle) {
            let conn = self
                .pool
                .get()
                .await
                .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                .map_err(tracerr::map_from)?;
            let tx = connection::Tx::begin(conn)
                .await
                .map_err(tracerr::wrap!())?;
            log::trace!("transaction started");
            *state = State::Active(tx);
        }

        RwLockReadGuard::try_map(state.downgrade(), State::active).map_err(
            |_| {
                tracerr::new!(database::Error::from(
                    postgres::Error::TxFinished,
                ))
            },
        )
    }

    /// Commits this [`Tx`] client.
    ///
    /// Does nothing if no statement has been run.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction, or it has been committed
    /// already.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let mut state = self.state.write().await;
        match mem::replace(&mut *state, State::Finished) {
            State::Idle => Ok(()),
            State::Active(tx) => {
                tx.commit().await.map_err(tracerr::wrap!())?;
                log::trace!("transaction committed");
                Ok(())
            }
            State::Finished => Err(tracerr::new!(database::Error::from(
                postgres::Error::TxFinished,
            ))),
        }
    }
}

impl State {
    /// Returns the running transaction, if any.
    fn active(&self) -> Option<&connection::Tx> {
        match self {
            Self::Active(tx) => Some(tx),
            Self::Idle | Self::Finished => None,
        }
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.connection().await.map_err(tracerr::wrap!())?;
        tx.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.connection().await.map_err(tracerr::wrap!())?;
        tx.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.connection().await.map_err(tracerr::wrap!())?;
        tx.exec(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn batch_exec(
        &self,
        script: &str,
    ) -> Result<(), Traced<database::Error>> {
        let tx = self.connection().await.map_err(tracerr::wrap!())?;
        tx.batch_exec(script).await.map_err(tracerr::wrap!())
    }
}
