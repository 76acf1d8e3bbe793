//! # gridconv-io: Case File I/O & Conversion
//!
//! Moves power-grid cases between the MATPOWER text format and the
//! pandapower tabular model, keeping element order and in-service status
//! intact in both directions.
//!
//! ## Pipelines
//!
//! - [`importers::import_case`] - `.m` case + shunts/names side-cars -> [`gridconv_core::GridModel`]
//! - [`exporters::export_case`] - model -> `.m` case + shunts/names side-cars
//!
//! MATPOWER drops out-of-service machines and branches, which would shift
//! every following row. The exporter therefore converts with everything in
//! service and writes the real status back into the `gen` and `branch`
//! status columns. Shunt step counts have no MATPOWER column and travel in
//! the shunts side-car instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use gridconv_io::{exporters::export_case, importers::import_case};
//!
//! fn main() -> anyhow::Result<()> {
//!     let model = import_case(Path::new("dataset/matpower/case14.m"))?;
//!     export_case(&model, Path::new("dataset_matpower"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`importers`] - MATPOWER parser, import pipeline, pandapower JSON reader
//! - [`exporters`] - MATPOWER writer, export pipeline, pandapower JSON writer
//! - [`convert`] - [`convert::from_ppc`] / [`convert::to_ppc`]
//! - [`sidecar`] - names JSON and shunts CSV codecs
//! - [`layout`] - directory names and conversion constants
//! - [`helpers`] - checked numeric conversions
//!
//! ## Error Handling
//!
//! Functions return [`anyhow::Result`] with the offending path in the
//! context chain. Parse and conversion failures carry a
//! [`gridconv_core::GridError`] at the root, so callers can downcast to tell
//! them apart from I/O failures.

pub mod convert;
pub mod exporters;
pub mod helpers;
pub mod importers;
pub mod layout;
pub mod sidecar;

pub use convert::{from_ppc, to_ppc};
pub use exporters::{export_case, export_model_to_pandapower};
pub use importers::{import_case, load_pandapower_model};

#[cfg(test)]
mod tests;
