//! Background [`Task`]s definitions.

mod background;
pub mod fill_estate_ids;

pub use common::Handler as Task;

pub use self::{background::Background, fill_estate_ids::FillEstateIds};
