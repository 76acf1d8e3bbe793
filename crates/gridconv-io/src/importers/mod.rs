//! Readers for MATPOWER cases and pandapower models.
//!
//! - [`parse_matpower_file`] - raw `.m` case into a [`gridconv_core::LegacyCase`]
//! - [`import_case`] - full MATPOWER import with side-cars
//! - [`load_pandapower_model`] - pandapower JSON into a [`gridconv_core::GridModel`]
//!
//! ```no_run
//! use gridconv_io::importers::import_case;
//!
//! let model = import_case(std::path::Path::new("dataset/matpower/case14.m"))?;
//! println!("{} buses", model.bus.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod matpower;
pub mod matpower_parser;
pub mod pandapower;

pub use matpower::import_case;
pub use matpower_parser::{parse_matpower_file, parse_matpower_string};
pub use pandapower::load_pandapower_model;
