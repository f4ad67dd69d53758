//! [`Query`] collection related to a single [`Chair`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{chair, Chair},
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries a [`Chair`] by its [`chair::Id`], as long as it's still in stock.
#[derive(Clone, Copy, Debug)]
pub struct ById(pub chair::Id);

impl<Db, Kv> Query<ById> for Service<Db, Kv>
where
    Db: Database<
        Select<By<Option<Chair>, chair::Id>>,
        Ok = Option<Chair>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ById(id): ById,
    ) -> Result<Self::Ok, Self::Err> {
        let chair = self
            .database()
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(chair.filter(Chair::is_available))
    }
}

#[cfg(test)]
mod spec {
    use crate::{fixture, Query as _};

    use super::ById;

    #[tokio::test]
    async fn hides_sold_out_chairs() {
        let mut sold_out = fixture::chair(2, 10);
        sold_out.stock = 0;
        let (svc, _bg) =
            fixture::service([fixture::chair(1, 10), sold_out], []);

        let found = svc.execute(ById(1_i64.into())).await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(1_i64.into()));

        assert_eq!(svc.execute(ById(2_i64.into())).await.unwrap(), None);
        assert_eq!(svc.execute(ById(3_i64.into())).await.unwrap(), None);
    }
}
