//! [`Estate`] endpoints.

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
    domain::{self, catalog::EstateConditions, estate, Coordinate},
    query,
    read::{self, estate::search},
    Command as _,
};

use crate::{define_error, AsError, Error, Service};

use super::{record, Customer, RequestError};

/// [`domain::Estate`] as exposed to clients.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estate {
    /// ID of this [`Estate`].
    pub id: i64,

    /// Name of this [`Estate`].
    pub name: String,

    /// Description of this [`Estate`].
    pub description: String,

    /// Thumbnail URL of this [`Estate`].
    pub thumbnail: String,

    /// Postal address of this [`Estate`].
    pub address: String,

    /// Latitude of this [`Estate`] location.
    pub latitude: f64,

    /// Longitude of this [`Estate`] location.
    pub longitude: f64,

    /// Monthly rent of this [`Estate`].
    pub rent: i64,

    /// Height of the entrance door.
    pub door_height: i64,

    /// Width of the entrance door.
    pub door_width: i64,

    /// Comma-separated features of this [`Estate`].
    pub features: String,
}

impl From<domain::Estate> for Estate {
    fn from(estate: domain::Estate) -> Self {
        let domain::Estate {
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
            popularity: _,
        } = estate;
        Self {
            id: id.into(),
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
        }
    }
}

/// Query string of a [`search()`] request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    /// Index of the door height range.
    pub door_height_range_id: String,

    /// Index of the door width range.
    pub door_width_range_id: String,

    /// Index of the rent range.
    pub rent_range_id: String,

    /// Comma-separated features.
    pub features: String,

    /// Zero-based page number.
    pub page: String,

    /// Page size.
    pub per_page: String,
}

/// Response with a counted list of [`Estate`]s.
#[derive(Clone, Debug, Serialize)]
pub struct CountedResponse {
    /// Total count of the matching [`Estate`]s.
    pub count: i64,

    /// Returned [`Estate`]s.
    pub estates: Vec<Estate>,
}

/// Response listing [`Estate`]s.
#[derive(Clone, Debug, Serialize)]
pub struct ListResponse {
    /// Listed [`Estate`]s.
    pub estates: Vec<Estate>,
}

impl ListResponse {
    fn new(estates: Vec<domain::Estate>) -> Self {
        Self {
            estates: estates.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of a [`nazotte()`] request.
#[derive(Clone, Debug, Deserialize)]
pub struct PolygonRequest {
    /// Vertices of the drawn polygon.
    pub coordinates: Vec<Coordinate>,
}

/// Searches [`Estate`]s page by page.
///
/// # Errors
///
/// If the request is malformed or the search fails.
pub async fn search(
    Extension(service): Extension<Service>,
    request: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<CountedResponse>, Error> {
    let Query(SearchRequest {
        door_height_range_id,
        door_width_range_id,
        rent_range_id,
        features,
        page,
        per_page,
    }) = request.map_err(AsError::into_error)?;

    let arguments =
        Arguments::parse(&page, &per_page).map_err(AsError::into_error)?;
    let search::Page { count, estates } = service
        .execute(query::estates::Search {
            params: search::Params {
                door_height_range_id,
                door_width_range_id,
                rent_range_id,
                features,
            },
            arguments,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(CountedResponse {
        count,
        estates: estates.into_iter().map(Into::into).collect(),
    }))
}

/// Returns the [`EstateConditions`] clients can search [`Estate`]s by.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn condition(
    Extension(service): Extension<Service>,
) -> Json<EstateConditions> {
    Json(service.config().catalog.estate.clone())
}

/// Lists the cheapest [`Estate`]s.
///
/// # Errors
///
/// If the listing fails.
pub async fn low_priced(
    Extension(service): Extension<Service>,
) -> Result<Json<ListResponse>, Error> {
    service
        .execute(query::estates::Cheapest::by(read::Cheapest::LOW_PRICED))
        .await
        .map(|e| Json(ListResponse::new(e)))
        .map_err(AsError::into_error)
}

/// Returns an [`Estate`].
///
/// # Errors
///
/// With [`RequestError::NotFound`] if there is no such [`Estate`].
pub async fn detail(
    Extension(service): Extension<Service>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Estate>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(query::estate::ById::by(id.into()))
        .await
        .map_err(AsError::into_error)?
        .map(|e| Json(e.into()))
        .ok_or_else(|| RequestError::NotFound.into())
}

/// Imports [`Estate`]s from the CSV file sent as the `estates` field.
///
/// # Errors
///
/// If the file is absent or malformed, or the import fails.
pub async fn import(
    Extension(service): Extension<Service>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<http::StatusCode, Error> {
    let multipart = multipart.map_err(AsError::into_error)?;
    let rows = record::read(multipart, "estates")
        .await?
        .ok_or_else(|| Error::from(RequestError::FileRequired))?;
    let estates = rows
        .iter()
        .map(decode)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AsError::into_error)?;

    service
        .execute(command::ImportEstates { estates })
        .await
        .map_err(AsError::into_error)?;

    Ok(http::StatusCode::CREATED)
}

/// Searches [`Estate`]s located inside the drawn polygon.
///
/// # Errors
///
/// If the polygon has no vertices or the search fails.
pub async fn nazotte(
    Extension(service): Extension<Service>,
    request: Result<Json<PolygonRequest>, JsonRejection>,
) -> Result<Json<CountedResponse>, Error> {
    let Json(PolygonRequest { coordinates }) =
        request.map_err(AsError::into_error)?;

    let estates = service
        .execute(query::estates::InPolygon {
            vertices: coordinates,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(CountedResponse {
        count: i64::try_from(estates.len()).unwrap_or(i64::MAX),
        estates: estates.into_iter().map(Into::into).collect(),
    }))
}

/// Requests documents of an [`Estate`] to be sent by email.
///
/// # Errors
///
/// If no email is provided or there is no such [`Estate`].
pub async fn request_document(
    Extension(service): Extension<Service>,
    id: Result<Path<i64>, PathRejection>,
    customer: Result<Json<Customer>, JsonRejection>,
) -> Result<http::StatusCode, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let Json(customer) = customer.map_err(AsError::into_error)?;

    service
        .execute(command::RequestEstateDocument {
            estate_id: id.into(),
            email: customer.email()?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(http::StatusCode::OK)
}

/// Recommends [`Estate`]s the provided chair can be carried into.
///
/// # Errors
///
/// If there is no such chair or the search fails.
pub async fn recommended(
    Extension(service): Extension<Service>,
    chair_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ListResponse>, Error> {
    let Path(chair_id) = chair_id.map_err(AsError::into_error)?;

    service
        .execute(query::estates::Recommended {
            chair: chair_id.into(),
        })
        .await
        .map(|e| Json(ListResponse::new(e)))
        .map_err(AsError::into_error)
}

/// Decodes a [`domain::Estate`] out of its CSV row.
fn decode(
    row: &StringRecord,
) -> Result<domain::Estate, record::DecodeError> {
    let mut rec = record::Record::new(row);
    let estate = domain::Estate {
        id: estate::Id::from(rec.int()),
        name: rec.string(),
        description: rec.string(),
        thumbnail: rec.string(),
        address: rec.string(),
        latitude: rec.float(),
        longitude: rec.float(),
        rent: rec.int(),
        door_height: rec.int(),
        door_width: rec.int(),
        features: rec.string(),
        popularity: rec.int(),
    };
    rec.finish().map(|()| estate)
}

impl AsError for query::estates::search::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cache(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
            Self::InvalidCondition(e) => e.try_as_error(),
        }
    }
}

impl AsError for query::estates::in_polygon::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMPTY_POLYGON"]
                #[status = BAD_REQUEST]
                #[message = "`coordinates` must contain at least one vertex"]
                EmptyPolygon,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmptyPolygon => Some(Error::EmptyPolygon.into()),
        }
    }
}

impl AsError for query::estates::recommended::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "UNKNOWN_CHAIR"]
                #[status = BAD_REQUEST]
                #[message = "Requested chair does not exist"]
                UnknownChair,
            }
        }

        match self {
            Self::ChairNotExists(_) => Some(Error::UnknownChair.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::import_estates::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ESTATE_EXISTS"]
                #[status = CONFLICT]
                #[message = "`Estate` with the same ID exists already"]
                AlreadyExists,
            }
        }

        match self {
            Self::AlreadyExists(_) => Some(Error::AlreadyExists.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::request_estate_document::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EstateNotExists(_) => Some(RequestError::NotFound.into()),
        }
    }
}
