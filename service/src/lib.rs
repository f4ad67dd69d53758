//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::{error::Error, path::PathBuf, sync::Arc};

use common::operations::{By, Start};
use derive_more::Debug;
use tokio::sync::mpsc;

#[cfg(doc)]
use infra::{Cache, Database};

pub use self::{command::Command, query::Query, task::Task};

use self::domain::Catalog;

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Search conditions offered to clients.
    pub catalog: Arc<Catalog>,

    /// [`task::FillEstateIds`] configuration.
    pub fill_estate_ids: task::fill_estate_ids::Config,

    /// SQL scripts resetting the [`Database`] to its seed state, in order.
    pub seed_scripts: Vec<PathBuf>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Kv> {
    /// Configuration of this [`Service`].
    config: Arc<Config>,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Cache`] of this [`Service`].
    cache: Kv,

    /// Queue of [`task::FillEstateIds`] jobs.
    #[debug(skip)]
    fills: mpsc::UnboundedSender<task::fill_estate_ids::Job>,
}

/// Queue of [`task::FillEstateIds`] jobs to be processed.
pub type FillJobs = mpsc::UnboundedReceiver<task::fill_estate_ids::Job>;

impl<Db, Kv> Service<Db, Kv> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        cache: Kv,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<By<task::FillEstateIds<Self>, FillJobs>>,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let (fills, jobs) = mpsc::unbounded_channel();
        let this = Service {
            config: Arc::new(config),
            database,
            cache,
            fills,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("task::FillEstateIds", async move {
            svc.execute(Start(By::new(jobs))).await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Cache`] of this [`Service`].
    #[must_use]
    pub fn cache(&self) -> &Kv {
        &self.cache
    }

    /// Enqueues the provided [`task::FillEstateIds`] job.
    ///
    /// Returns `false` if the job cannot be processed anymore.
    fn enqueue_fill(&self, job: task::fill_estate_ids::Job) -> bool {
        self.fills.send(job).is_ok()
    }
}
