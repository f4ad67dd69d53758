//! [`Estate`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{estate, polygon::BoundingBox, Estate, Polygon},
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

/// Builds an [`Estate`] out of the provided [`Row`].
fn from_row(row: &Row) -> Estate {
    Estate {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        thumbnail: row.get("thumbnail"),
        address: row.get("address"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        rent: row.get("rent"),
        door_height: row.get("door_height"),
        door_width: row.get("door_width"),
        features: row.get("features"),
        popularity: row.get("popularity"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<estate::Id, Estate>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[estate::Id]>,
{
    type Ok = HashMap<estate::Id, Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<estate::Id, Estate>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[estate::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, address, \
                   latitude, longitude, \
                   rent, door_height, door_width, \
                   features, popularity \
            FROM estates \
            WHERE id = ANY($1::INT8[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let estate = from_row(row);
                (estate.id, estate)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Estate>, estate::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<estate::Id, Estate>, [estate::Id; 1]>>,
        Ok = HashMap<estate::Id, Estate>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Estate>, estate::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<read::estate::search::TotalCount, Conditions>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::search::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::search::TotalCount, Conditions>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let sql = format!(
            "SELECT COUNT(*)::INT8 \
             FROM estates \
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

impl<C> Database<Select<By<Vec<Estate>, read::estate::search::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Estate>, read::estate::search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::estate::search::Selector { arguments, filter } =
            by.into_inner();

        let limit = rows_count(arguments.limit());
        let offset = rows_count(arguments.offset());

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &offset];
        let sql = format!(
            "SELECT id, name, description, thumbnail, address, \
                    latitude, longitude, \
                    rent, door_height, door_width, \
                    features, popularity \
             FROM estates \
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

impl<C> Database<Select<By<read::estate::search::Ids, Conditions>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::search::Ids;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::search::Ids, Conditions>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let sql = format!(
            "SELECT id \
             FROM estates \
             WHERE {} \
             ORDER BY popularity DESC, id ASC",
            condition::render(&conditions, &mut ps),
        );
        Ok(read::estate::search::Ids(
            self.query(&sql, ps.as_slice())
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(|row| row.get("id"))
                .collect(),
        ))
    }
}

impl<C> Database<Select<By<read::estate::InBoundingBox, BoundingBox>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::InBoundingBox;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::InBoundingBox, BoundingBox>>,
    ) -> Result<Self::Ok, Self::Err> {
        let BoundingBox { min, max } = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, address, \
                   latitude, longitude, \
                   rent, door_height, door_width, \
                   features, popularity \
            FROM estates \
            WHERE latitude <= $1::FLOAT8 \
              AND latitude >= $2::FLOAT8 \
              AND longitude <= $3::FLOAT8 \
              AND longitude >= $4::FLOAT8 \
            ORDER BY popularity DESC, id ASC";
        Ok(read::estate::InBoundingBox(
            self.query(
                SQL,
                &[
                    &max.latitude,
                    &min.latitude,
                    &max.longitude,
                    &min.longitude,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect(),
        ))
    }
}

impl<C> Database<Select<By<read::estate::IsInPolygon, (estate::Id, Polygon)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::IsInPolygon;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::estate::IsInPolygon, (estate::Id, Polygon)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (id, polygon) = by.into_inner();
        let polygon = polygon.to_string();

        const SQL: &str = "\
            SELECT ($2::TEXT)::POLYGON @> POINT(latitude, longitude) \
                   AND NOT (\
                       POINT(latitude, longitude) \
                       <@ PATH(($2::TEXT)::POLYGON)\
                   ) AS inside \
            FROM estates \
            WHERE id = $1::INT8";
        self.query_opt(SQL, &[&id, &polygon])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                read::estate::IsInPolygon(
                    row.is_some_and(|r| r.get::<_, bool>("inside")),
                )
            })
    }
}

impl<C>
    Database<Select<By<Vec<Estate>, read::estate::recommended::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Estate>, read::estate::recommended::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::estate::recommended::Selector { opening, limit } =
            by.into_inner();
        let limit = rows_count(limit);

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, address, \
                   latitude, longitude, \
                   rent, door_height, door_width, \
                   features, popularity \
            FROM estates \
            WHERE (door_width >= $1::INT8 AND door_height >= $2::INT8) \
               OR (door_width >= $2::INT8 AND door_height >= $1::INT8) \
            ORDER BY popularity DESC, id ASC \
            LIMIT $3::INT8";
        Ok(self
            .query(SQL, &[&opening.short, &opening.long, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Estate>, read::Cheapest>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Estate>, read::Cheapest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Cheapest { limit } = by.into_inner();
        let limit = rows_count(limit);

        const SQL: &str = "\
            SELECT id, name, description, thumbnail, address, \
                   latitude, longitude, \
                   rent, door_height, door_width, \
                   features, popularity \
            FROM estates \
            ORDER BY rent ASC, id ASC \
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

impl<C> Database<Insert<Estate>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(estate): Insert<Estate>,
    ) -> Result<Self::Ok, Self::Err> {
        let Estate {
            id,
            name,
            description,
            thumbnail,
            address,
            latitude,
            longitude,
            rent,
            door_height,
            door_width,
            features,
            popularity,
        } = estate;

        const SQL: &str = "\
            INSERT INTO estates (\
                id, name, description, thumbnail, address, \
                latitude, longitude, \
                rent, door_height, door_width, \
                features, popularity \
            ) VALUES (\
                $1::INT8, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, \
                $6::FLOAT8, $7::FLOAT8, \
                $8::INT8, $9::INT8, $10::INT8, \
                $11::VARCHAR, $12::INT8 \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &description,
                &thumbnail,
                &address,
                &latitude,
                &longitude,
                &rent,
                &door_height,
                &door_width,
                &features,
                &popularity,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
