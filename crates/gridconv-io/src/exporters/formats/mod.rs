//! Format-specific writers.
//!
//! - **MATPOWER** (.m files) - `mpc.bus`, `mpc.gen` and `mpc.branch` blocks
//! - **pandapower** (JSON) - all seven model tables

pub mod matpower;
pub mod pandapower;

pub use matpower::{format_value, write_matpower_case};
pub use pandapower::export_model_to_pandapower;
