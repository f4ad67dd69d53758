//! Initialization endpoint.

use axum::{Extension, Json};
use serde::Serialize;
use service::{command, Command as _};

use crate::{AsError, Error, Service};

/// Response to an [`initialize()`] request.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct InitializeResponse {
    /// Language the server is implemented in.
    pub language: &'static str,
}

/// Resets listings to their seed state.
///
/// # Errors
///
/// If any seed script fails.
pub async fn initialize(
    Extension(service): Extension<Service>,
) -> Result<Json<InitializeResponse>, Error> {
    service
        .execute(command::Initialize)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(InitializeResponse { language: "rust" }))
}

impl AsError for command::initialize::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cache(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
            Self::Script(..) => None,
        }
    }
}
