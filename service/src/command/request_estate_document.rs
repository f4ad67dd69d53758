//! [`Command`] for requesting documents of an [`Estate`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{estate, Estate},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for requesting documents of an [`Estate`] to be sent by
/// email.
#[derive(Clone, Debug)]
pub struct RequestEstateDocument {
    /// ID of the [`Estate`] to send documents of.
    pub estate_id: estate::Id,

    /// Email to send documents to.
    pub email: String,
}

impl<Db, Kv> Command<RequestEstateDocument> for Service<Db, Kv>
where
    Db: Database<
        Select<By<Option<Estate>, estate::Id>>,
        Ok = Option<Estate>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RequestEstateDocument,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RequestEstateDocument { estate_id, email } = cmd;

        let estate = self
            .database()
            .execute(Select(By::new(estate_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EstateNotExists(estate_id))
            .map_err(tracerr::wrap!())?;

        log::info!(
            "documents of `Estate(id: {})` requested to `{email}`",
            estate.id,
        );
        Ok(())
    }
}

/// Error of [`RequestEstateDocument`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Estate`] doesn't exist.
    #[display("`Estate(id: {_0})` doesn't exist")]
    #[from(ignore)]
    EstateNotExists(#[error(not(source))] estate::Id),
}
