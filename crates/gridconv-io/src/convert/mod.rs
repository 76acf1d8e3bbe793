//! Conversion between the legacy case and the tabular grid model.
//!
//! [`from_ppc`] and [`to_ppc`] are plain value transformations with no file
//! access; the import and export pipelines wrap them with the bus-type
//! normalization, status restoration and side-car handling.

mod from_ppc;
mod to_ppc;

pub use from_ppc::from_ppc;
pub use to_ppc::to_ppc;
