//! Domain definitions.

pub mod catalog;
pub mod chair;
pub mod estate;
pub mod polygon;

pub use self::{
    catalog::Catalog,
    chair::Chair,
    estate::Estate,
    polygon::{Coordinate, Polygon},
};
