//! [`Command`] definition.

pub mod buy_chair;
pub mod import_chairs;
pub mod import_estates;
pub mod initialize;
pub mod request_estate_document;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    buy_chair::BuyChair, import_chairs::ImportChairs,
    import_estates::ImportEstates, initialize::Initialize,
    request_estate_document::RequestEstateDocument,
};
