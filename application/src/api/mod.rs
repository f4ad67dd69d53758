//! HTTP API definitions.

pub mod chair;
pub mod estate;
pub mod initialize;
pub mod record;

use serde::Deserialize;
use service::read::condition::BuildError;

use crate::{define_error, AsError, Error};

define_error! {
    enum RequestError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Requested listing does not exist"]
        NotFound,

        #[code = "EMAIL_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "`email` must be provided"]
        EmailRequired,

        #[code = "FILE_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "CSV file must be provided"]
        FileRequired,
    }
}

/// Body of the requests made on behalf of a customer.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Customer {
    /// Email of the customer.
    pub email: Option<String>,
}

impl Customer {
    /// Returns the email of this [`Customer`].
    ///
    /// # Errors
    ///
    /// With [`RequestError::EmailRequired`] if there is no email.
    pub fn email(self) -> Result<String, Error> {
        self.email.ok_or_else(|| RequestError::EmailRequired.into())
    }
}

impl AsError for BuildError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_RANGE_INDEX"]
                #[status = BAD_REQUEST]
                #[message = "Unknown range index is requested"]
                InvalidRangeIndex,

                #[code = "NO_SEARCH_CONDITION"]
                #[status = BAD_REQUEST]
                #[message = "At least one search condition must be provided"]
                NoSearchCondition,
            }
        }

        match self {
            Self::InvalidRangeIndex(_) => {
                Some(Error::InvalidRangeIndex.into())
            }
            Self::NoSearchCondition => Some(Error::NoSearchCondition.into()),
        }
    }
}
