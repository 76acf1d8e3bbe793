//! Writers for legacy cases and grid models, and the MATPOWER export
//! pipeline that produces a case plus its side-cars.

pub mod case;
pub mod formats;

pub use case::export_case;
pub use formats::{export_model_to_pandapower, write_matpower_case};
