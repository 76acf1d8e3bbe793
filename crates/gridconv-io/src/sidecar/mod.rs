//! Side-car files stored next to each MATPOWER case.

pub mod names;
pub mod shunts;

pub use names::{apply_names, write_names, NamesError};
pub use shunts::{calibrate_shunts, read_shunts, shunt_records, write_shunts, ShuntRecord};
