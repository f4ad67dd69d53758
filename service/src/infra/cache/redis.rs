//! Redis [`Cache`] implementation.
//!
//! Every cached [`Estate`] ID list is a Redis list stored under the
//! `estate:ids:<fingerprint>` key. The Redis database is expected to be
//! dedicated to the cache, as invalidation flushes it entirely.

use std::fmt;

use common::operations::{By, Delete, Select, Update};
use deadpool_redis::{Connection, Pool, Runtime};
use derive_more::{Display, Error as StdError, From};
use redis::AsyncCommands as _;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Estate;
use crate::{
    domain::estate,
    infra::cache::{self, Cache},
    read::estate::{cached, search::Fingerprint},
};

pub use deadpool_redis::{Config, PoolConfig};

/// Prefix of the keys holding cached ID lists.
const IDS_KEY_PREFIX: &str = "estate:ids:";

/// Redis [`Cache`] client.
#[derive(Clone)]
pub struct Redis {
    /// Pool of Redis connections.
    pool: Pool,
}

impl fmt::Debug for Redis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Redis")
            .field("status", &self.pool.status())
            .finish_non_exhaustive()
    }
}

impl Redis {
    /// Creates a new [`Redis`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Redis`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<cache::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1))
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self { pool })
    }

    /// Retrieves a [`Connection`] from the pool.
    async fn connection(&self) -> Result<Connection, Traced<cache::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Returns the key of the ID list cached for the provided [`Fingerprint`].
fn ids_key(fingerprint: &Fingerprint) -> String {
    format!("{IDS_KEY_PREFIX}{fingerprint}")
}

/// Converts a list position into a Redis list index.
fn list_index(pos: usize) -> isize {
    isize::try_from(pos).unwrap_or(isize::MAX)
}

impl Cache<Select<By<Option<cached::Slice>, cached::Selector>>> for Redis {
    type Ok = Option<cached::Slice>;
    type Err = Traced<cache::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<cached::Slice>, cached::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let cached::Selector {
            fingerprint,
            arguments,
        } = by.into_inner();
        let key = ids_key(&fingerprint);

        let mut conn = self.connection().await.map_err(tracerr::wrap!())?;

        // Empty lists are never stored, so zero length means absence.
        let total: usize = conn
            .llen(&key)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        if total == 0 {
            return Ok(None);
        }

        let window = arguments.window(total);
        if window.is_empty() {
            return Ok(Some(cached::Slice {
                ids: Vec::new(),
                total,
            }));
        }

        // The list may have been flushed since `LLEN`, so fewer IDs than
        // requested is fine here.
        let ids: Vec<i64> = conn
            .lrange(&key, list_index(window.start), list_index(window.end - 1))
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Some(cached::Slice {
            ids: ids.into_iter().map(estate::Id::from).collect(),
            total,
        }))
    }
}

impl Cache<Update<cached::Entry>> for Redis {
    type Ok = ();
    type Err = Traced<cache::Error>;

    async fn execute(
        &self,
        Update(entry): Update<cached::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        let cached::Entry { fingerprint, ids } = entry;
        if ids.is_empty() {
            return Ok(());
        }
        let key = ids_key(&fingerprint);
        let ids = ids.into_iter().map(i64::from).collect::<Vec<_>>();

        let mut conn = self.connection().await.map_err(tracerr::wrap!())?;

        let (): () = redis::pipe()
            .atomic()
            .del(&key)
            .ignore()
            .rpush(&key, ids)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(())
    }
}

impl Cache<Delete<cached::All>> for Redis {
    type Ok = ();
    type Err = Traced<cache::Error>;

    async fn execute(
        &self,
        _: Delete<cached::All>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut conn = self.connection().await.map_err(tracerr::wrap!())?;

        let (): () = redis::cmd("FLUSHDB")
            .arg("ASYNC")
            .query_async(&mut conn)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(())
    }
}

/// Redis cache [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Redis command error.
    #[display("Redis command failed: {_0}")]
    Command(redis::RedisError),

    /// Error of creating a new [`Pool`].
    #[display("Failed to create a new `Pool`: {_0}")]
    PoolCreationError(deadpool_redis::CreatePoolError),

    /// [`Pool`] error.
    #[display("`Pool` error: {_0}")]
    PoolError(deadpool_redis::PoolError),
}
