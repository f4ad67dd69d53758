//! In-memory [`Cache`] used in tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use common::operations::{By, Delete, Select, Update};
use derive_more::{Display, Error as StdError};
use tokio::sync::Notify;
use tracerr::Traced;

use crate::{
    domain::estate,
    infra::cache::{self, Cache},
    read::estate::{cached, search::Fingerprint},
};

/// In-memory [`Cache`] observing its own usage.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared state of this [`Memory`] cache.
    inner: Arc<Inner>,
}

/// Shared state of a [`Memory`] cache.
#[derive(Debug, Default)]
struct Inner {
    /// Cached ID lists.
    lists: Mutex<HashMap<Fingerprint, Vec<estate::Id>>>,

    /// Number of reads found an entry.
    hits: AtomicUsize,

    /// Number of reads found no entry.
    misses: AtomicUsize,

    /// Whether reads fail.
    broken: AtomicBool,

    /// Notified whenever an entry is written.
    filled: Notify,
}

impl Memory {
    /// Returns the number of reads served from an entry.
    pub fn hits(&self) -> usize {
        self.inner.hits.load(Ordering::SeqCst)
    }

    /// Returns the number of reads found no entry.
    pub fn misses(&self) -> usize {
        self.inner.misses.load(Ordering::SeqCst)
    }

    /// Makes all the following reads fail (or succeed again).
    pub fn break_reads(&self, broken: bool) {
        self.inner.broken.store(broken, Ordering::SeqCst);
    }

    /// Waits until an entry is written.
    pub async fn filled(&self) {
        self.inner.filled.notified().await;
    }

    /// Returns the cached ID list for the provided [`Fingerprint`], if any.
    pub fn entry(&self, fingerprint: &Fingerprint) -> Option<Vec<estate::Id>> {
        self.inner.lists.lock().unwrap().get(fingerprint).cloned()
    }
}

impl Cache<Select<By<Option<cached::Slice>, cached::Selector>>> for Memory {
    type Ok = Option<cached::Slice>;
    type Err = Traced<cache::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<cached::Slice>, cached::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.inner.broken.load(Ordering::SeqCst) {
            return Err(tracerr::new!(cache::Error::from(Error)));
        }

        let cached::Selector {
            fingerprint,
            arguments,
        } = by.into_inner();
        let lists = self.inner.lists.lock().unwrap();
        let Some(ids) = lists.get(&fingerprint) else {
            _ = self.inner.misses.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        };
        _ = self.inner.hits.fetch_add(1, Ordering::SeqCst);

        Ok(Some(cached::Slice {
            ids: arguments.slice(ids).to_vec(),
            total: ids.len(),
        }))
    }
}

impl Cache<Update<cached::Entry>> for Memory {
    type Ok = ();
    type Err = Traced<cache::Error>;

    async fn execute(
        &self,
        Update(entry): Update<cached::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        let cached::Entry { fingerprint, ids } = entry;
        if !ids.is_empty() {
            _ = self.inner.lists.lock().unwrap().insert(fingerprint, ids);
        }
        self.inner.filled.notify_one();
        Ok(())
    }
}

impl Cache<Delete<cached::All>> for Memory {
    type Ok = ();
    type Err = Traced<cache::Error>;

    async fn execute(
        &self,
        _: Delete<cached::All>,
    ) -> Result<Self::Ok, Self::Err> {
        self.inner.lists.lock().unwrap().clear();
        Ok(())
    }
}

/// [`Memory`] cache is broken on purpose.
#[derive(Clone, Copy, Debug, Display, StdError)]
#[display("cache is broken")]
pub struct Error;
