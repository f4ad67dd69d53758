//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s.
///
/// [`Task`]s are run on the current thread, so they don't need to be [`Send`].
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are spawned into.
    set: task::LocalSet,

    /// Handles of spawned [`Task`]s.
    handles: Vec<task::JoinHandle<Result<(), BoxError>>>,
}

impl Background {
    /// Spawns a new [`Task`] inside the [`Background`] environment.
    ///
    /// The `name` is only used for logging.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        self.handles.push(self.set.spawn_local(async move {
            log::debug!("`{name}` task started");
            let res = future.await;
            log::debug!("`{name}` task stopped");
            res.map_err(Into::into)
        }));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), BoxError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let all = future::try_join_all(handles.into_iter().map(|h| {
            h.map(|r| match r {
                Ok(res) => res,
                Err(e) => Err(BoxError::from(e)),
            })
        }));
        async move { set.run_until(all).await }
            .map_ok(drop)
            .boxed_local()
    }
}
