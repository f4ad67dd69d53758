//! [`Chair`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{chair, Chair},
    infra::{
        database::{
            self,
            postgres::{condition, Connection},
            Postgres,
        },
        Database,
    },
    read::{self, Conditions},
};

use super::rows_count;

/// Builds a [`Chair`] out of the provided [`Row`].
fn from_row(row: &Row) -> Chair {
    Chair {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        thumbnail: row.get("thumbnail"),
        price: row.get("price"),
        height: row.get("height"),
        width: row.get("width"),
        depth: row.get("depth"),
        color: row.get("color"),
        features: row.get("features"),
        kind: row.get("kind"),
        popularity: row.get("popularity"),
        stock: row.get("stock"),
    }
}

impl<C> Database<Select<By<Option<Chair>, chair::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Chair>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: chair::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, \
                   price, height, width, depth, \
                   color, features, kind, \
                   popularity, stock \
            FROM chairs \
            WHERE id = $1::INT8";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Lock<By<Option<Chair>, chair::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Option<Chair>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: chair::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, \
                   price, height, width, depth, \
                   color, features, kind, \
                   popularity, stock \
            FROM chairs \
            WHERE id = $1::INT8 \
              AND stock > 0 \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<read::chair::search::TotalCount, Conditions>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::chair::search::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::chair::search::TotalCount, Conditions>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let sql = format!(
            "SELECT COUNT(*)::INT8 \
             FROM chairs \
             WHERE {}",
            condition::render(&conditions, &mut ps),
        );
        self.query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| {
                rows.first().map_or(0, |r| r.get::<_, i64>(0)).into()
            })
    }
}

impl<C> Database<Select<By<Vec<Chair>, read::chair::search::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Chair>, read::chair::search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::chair::search::Selector { arguments, filter } =
            by.into_inner();

        let limit = rows_count(arguments.limit());
        let offset = rows_count(arguments.offset());

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &offset];
        let sql = format!(
            "SELECT id, name, description, thumbnail, \
                    price, height, width, depth, \
                    color, features, kind, \
                    popularity, stock \
             FROM chairs \
             WHERE {} \
             ORDER BY popularity DESC, id ASC \
             LIMIT $1::INT8 \
             OFFSET $2::INT8",
            condition::render(&filter, &mut ps),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Chair>, read::Cheapest>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Chair>, read::Cheapest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Cheapest { limit } = by.into_inner();
        let limit = rows_count(limit);

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, \
                   price, height, width, depth, \
                   color, features, kind, \
                   popularity, stock \
            FROM chairs \
            ORDER BY price ASC, id ASC \
            LIMIT $1::INT8";
        Ok(self
            .query(SQL, &[&limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Chair>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(chair): Insert<Chair>,
    ) -> Result<Self::Ok, Self::Err> {
        let Chair {
            id,
            name,
            description,
            thumbnail,
            price,
            height,
            width,
            depth,
            color,
            features,
            kind,
            popularity,
            stock,
        } = chair;

        const SQL: &str = "\
            INSERT INTO chairs (\
                id, name, description, thumbnail, \
                price, height, width, depth, \
                color, features, kind, \
                popularity, stock \
            ) VALUES (\
                $1::INT8, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::INT8, $6::INT8, $7::INT8, $8::INT8, \
                $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, \
                $12::INT8, $13::INT8 \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &description,
                &thumbnail,
                &price,
                &height,
                &width,
                &depth,
                &color,
                &features,
                &kind,
                &popularity,
                &stock,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Chair>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(chair): Update<Chair>,
    ) -> Result<Self::Ok, Self::Err> {
        let Chair {
            id,
            name,
            description,
            thumbnail,
            price,
            height,
            width,
            depth,
            color,
            features,
            kind,
            popularity,
            stock,
        } = chair;

        const SQL: &str = "\
            UPDATE chairs \
            SET name = $2::VARCHAR, \
                description = $3::VARCHAR, \
                thumbnail = $4::VARCHAR, \
                price = $5::INT8, \
                height = $6::INT8, \
                width = $7::INT8, \
                depth = $8::INT8, \
                color = $9::VARCHAR, \
                features = $10::VARCHAR, \
                kind = $11::VARCHAR, \
                popularity = $12::INT8, \
                stock = $13::INT8 \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &description,
                &thumbnail,
                &price,
                &height,
                &width,
                &depth,
                &color,
                &features,
                &kind,
                &popularity,
                &stock,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Chair, chair::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Chair, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: chair::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM chairs \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
