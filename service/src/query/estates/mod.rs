//! [`Query`] collection related to the multiple [`Estate`]s.

pub mod in_polygon;
pub mod recommended;
pub mod search;

use common::operations::By;

use crate::{domain::Estate, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

pub use self::{
    in_polygon::InPolygon, recommended::Recommended, search::Search,
};

/// Queries the cheapest [`Estate`]s.
pub type Cheapest = DatabaseQuery<By<Vec<Estate>, read::Cheapest>>;
