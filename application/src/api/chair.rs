//! [`Chair`] endpoints.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query,
    },
    Extension, Json,
};
use common::pagination::Arguments;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, catalog::ChairConditions, chair},
    query,
    read::{self, chair::search},
    Command as _,
};
use tracing as log;

use crate::{define_error, AsError, Error, Service};

use super::{record, Customer, RequestError};

/// [`domain::Chair`] as exposed to clients.
#[derive(Clone, Debug, Serialize)]
pub struct Chair {
    /// ID of this [`Chair`].
    pub id: i64,

    /// Name of this [`Chair`].
    pub name: String,

    /// Description of this [`Chair`].
    pub description: String,

    /// Thumbnail URL of this [`Chair`].
    pub thumbnail: String,

    /// Price of this [`Chair`].
    pub price: i64,

    /// Height of this [`Chair`].
    pub height: i64,

    /// Width of this [`Chair`].
    pub width: i64,

    /// Depth of this [`Chair`].
    pub depth: i64,

    /// Color of this [`Chair`].
    pub color: String,

    /// Comma-separated features of this [`Chair`].
    pub features: String,

    /// Kind of this [`Chair`].
    pub kind: String,
}

impl From<domain::Chair> for Chair {
    fn from(chair: domain::Chair) -> Self {
        let domain::Chair {
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
            popularity: _,
            stock: _,
        } = chair;
        Self {
            id: id.into(),
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
        }
    }
}

/// Query string of a [`search()`] request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    /// Index of the price range.
    pub price_range_id: String,

    /// Index of the height range.
    pub height_range_id: String,

    /// Index of the width range.
    pub width_range_id: String,

    /// Index of the depth range.
    pub depth_range_id: String,

    /// Exact kind.
    pub kind: String,

    /// Exact color.
    pub color: String,

    /// Comma-separated features.
    pub features: String,

    /// Zero-based page number.
    pub page: String,

    /// Page size.
    pub per_page: String,
}

/// Response to a [`search()`] request.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
    /// Total count of the matching [`Chair`]s.
    pub count: i64,

    /// [`Chair`]s of the requested page.
    pub chairs: Vec<Chair>,
}

/// Response listing [`Chair`]s.
#[derive(Clone, Debug, Serialize)]
pub struct ListResponse {
    /// Listed [`Chair`]s.
    pub chairs: Vec<Chair>,
}

/// Searches [`Chair`]s page by page.
///
/// # Errors
///
/// If the request is malformed or the search fails.
pub async fn search(
    Extension(service): Extension<Service>,
    request: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResponse>, Error> {
    let Query(SearchRequest {
        price_range_id,
        height_range_id,
        width_range_id,
        depth_range_id,
        kind,
        color,
        features,
        page,
        per_page,
    }) = request.map_err(AsError::into_error)?;

    let arguments =
        Arguments::parse(&page, &per_page).map_err(AsError::into_error)?;
    let search::Page { count, chairs } = service
        .execute(query::chairs::Search {
            params: search::Params {
                price_range_id,
                height_range_id,
                width_range_id,
                depth_range_id,
                kind,
                color,
                features,
            },
            arguments,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SearchResponse {
        count,
        chairs: chairs.into_iter().map(Into::into).collect(),
    }))
}

/// Returns the [`ChairConditions`] clients can search [`Chair`]s by.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn condition(
    Extension(service): Extension<Service>,
) -> Json<ChairConditions> {
    Json(service.config().catalog.chair.clone())
}

/// Lists the cheapest [`Chair`]s.
///
/// # Errors
///
/// If the listing fails.
pub async fn low_priced(
    Extension(service): Extension<Service>,
) -> Result<Json<ListResponse>, Error> {
    let chairs = service
        .execute(query::chairs::Cheapest::by(read::Cheapest::LOW_PRICED))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(ListResponse {
        chairs: chairs.into_iter().map(Into::into).collect(),
    }))
}

/// Returns a [`Chair`] available for sale.
///
/// # Errors
///
/// With [`RequestError::NotFound`] if there is no such [`Chair`] or it is
/// sold out.
pub async fn detail(
    Extension(service): Extension<Service>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Chair>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(query::chair::ById(id.into()))
        .await
        .map_err(AsError::into_error)?
        .map(|c| Json(c.into()))
        .ok_or_else(|| RequestError::NotFound.into())
}

/// Imports [`Chair`]s from the CSV file sent as the `chairs` field.
///
/// # Errors
///
/// If the file is absent or malformed, or the import fails.
pub async fn import(
    Extension(service): Extension<Service>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<http::StatusCode, Error> {
    let multipart = multipart.map_err(AsError::into_error)?;
    let rows = record::read(multipart, "chairs")
        .await?
        .ok_or_else(|| Error::from(RequestError::FileRequired))?;
    let chairs = rows
        .iter()
        .map(decode)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AsError::into_error)?;

    service
        .execute(command::ImportChairs { chairs })
        .await
        .map_err(AsError::into_error)?;

    Ok(http::StatusCode::CREATED)
}

/// Buys a single unit of a [`Chair`].
///
/// # Errors
///
/// If no email is provided, the [`Chair`] is sold out or the purchase fails.
pub async fn buy(
    Extension(service): Extension<Service>,
    id: Result<Path<i64>, PathRejection>,
    customer: Result<Json<Customer>, JsonRejection>,
) -> Result<http::StatusCode, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let Json(customer) = customer.map_err(AsError::into_error)?;
    let email = customer.email()?;

    service
        .execute(command::BuyChair {
            chair_id: id.into(),
        })
        .await
        .map_err(AsError::into_error)?;

    log::info!("`Chair(id: {id})` is bought by `{email}`");

    Ok(http::StatusCode::OK)
}

/// Decodes a [`domain::Chair`] out of its CSV row.
fn decode(row: &StringRecord) -> Result<domain::Chair, record::DecodeError> {
    let mut rec = record::Record::new(row);
    let chair = domain::Chair {
        id: chair::Id::from(rec.int()),
        name: rec.string(),
        description: rec.string(),
        thumbnail: rec.string(),
        price: rec.int(),
        height: rec.int(),
        width: rec.int(),
        depth: rec.int(),
        color: rec.string(),
        features: rec.string(),
        kind: rec.string(),
        popularity: rec.int(),
        stock: rec.int(),
    };
    rec.finish().map(|()| chair)
}

impl AsError for query::chairs::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidCondition(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::import_chairs::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CHAIR_EXISTS"]
                #[status = CONFLICT]
                #[message = "`Chair` with the same ID exists already"]
                AlreadyExists,
            }
        }

        match self {
            Self::AlreadyExists(_) => Some(Error::AlreadyExists.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::buy_chair::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ChairNotExists(_) => Some(RequestError::NotFound.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use csv::StringRecord;
    use service::domain::chair;

    use super::{decode, Chair};

    fn row() -> Vec<&'static str> {
        vec![
            "3",
            "Office chair",
            "Comfortable",
            "/images/3.png",
            "12000",
            "90",
            "60",
            "55",
            "black",
            "armrest,wheels",
            "office",
            "42",
            "7",
        ]
    }

    #[test]
    fn decodes_csv_rows() {
        let chair = decode(&StringRecord::from(row())).unwrap();

        assert_eq!(chair.id, chair::Id::from(3_i64));
        assert_eq!(chair.thumbnail, "/images/3.png");
        assert_eq!(chair.price, 12000);
        assert_eq!((chair.height, chair.width, chair.depth), (90, 60, 55));
        assert_eq!(chair.kind, "office");
        assert_eq!((chair.popularity, chair.stock), (42, 7));
    }

    #[test]
    fn rejects_malformed_rows() {
        let mut fields = row();
        fields[6] = "wide";
        assert!(decode(&StringRecord::from(fields)).is_err());

        let mut fields = row();
        _ = fields.pop();
        assert!(decode(&StringRecord::from(fields)).is_err());
    }

    #[test]
    fn hides_popularity_and_stock() {
        let chair = decode(&StringRecord::from(row())).unwrap();
        let json = serde_json::to_value(Chair::from(chair)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["features"], "armrest,wheels");
        assert!(json.get("popularity").is_none());
        assert!(json.get("stock").is_none());
    }
}
