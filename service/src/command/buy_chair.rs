//! [`Command`] for buying a [`Chair`].

use common::operations::{
    By, Commit, Delete, Lock, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{chair, Chair},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for buying a single unit of a [`Chair`].
///
/// The last unit sold removes the [`Chair`] from the listing.
#[derive(Clone, Copy, Debug)]
pub struct BuyChair {
    /// ID of the [`Chair`] to be bought.
    pub chair_id: chair::Id,
}

impl<Db, Kv> Command<BuyChair> for Service<Db, Kv>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Option<Chair>, chair::Id>>,
            Ok = Option<Chair>,
            Err = Traced<database::Error>,
        > + Database<Update<Chair>, Err = Traced<database::Error>>
        + Database<Delete<By<Chair, chair::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        BuyChair { chair_id }: BuyChair,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Only `Chair`s in stock are locked and returned.
        let mut chair = tx
            .execute(Lock(By::new(chair_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ChairNotExists(chair_id))
            .map_err(tracerr::wrap!())?;

        if chair.stock <= 1 {
            log::debug!("`Chair(id: {chair_id})` is sold out");
            tx.execute(Delete(By::<Chair, _>::new(chair_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        } else {
            chair.stock -= 1;
            tx.execute(Update(chair))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`BuyChair`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Chair`] doesn't exist or is out of stock.
    #[display("`Chair(id: {_0})` doesn't exist")]
    #[from(ignore)]
    ChairNotExists(#[error(not(source))] chair::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
