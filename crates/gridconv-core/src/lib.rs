//! # gridconv-core: Grid Case Value Types
//!
//! Provides the two value types every gridconv pipeline passes around:
//!
//! - [`LegacyCase`] - a MATPOWER case as three numeric blocks (`bus`, `gen`,
//!   `branch`) addressed by the fixed column positions in [`idx`].
//! - [`GridModel`] - the tabular (pandapower-style) model with one [`Table`] per
//!   component kind (`bus`, `load`, `gen`, `ext_grid`, `line`, `trafo`, `shunt`).
//!
//! Both are plain values: pipelines clone them before changing anything, so a
//! caller's case or model is never modified behind its back.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridconv_core::*;
//!
//! let mut model = GridModel::new("case2");
//! model.bus.push(0, Bus { vn_kv: 110.0, ..Bus::default() });
//! model.bus.push(1, Bus { vn_kv: 110.0, ..Bus::default() });
//!
//! model.set_names(TableKey::Bus, vec![Some("North".into()), Some("South".into())])?;
//! assert_eq!(model.names(TableKey::Bus)[1].as_deref(), Some("South"));
//! # Ok::<(), GridError>(())
//! ```
//!
//! ## Row order
//!
//! No identifier survives a MATPOWER round-trip; the only link between a
//! legacy row and a model element is its position. Every operation in this
//! crate preserves row order.

pub mod case;
pub mod elements;
pub mod error;
pub mod idx;
pub mod model;

pub use case::{CaseArray, LegacyCase};
pub use elements::{Bus, Element, ExtGrid, Gen, Line, Load, Shunt, Trafo};
pub use error::{GridError, GridResult};
pub use model::{GridModel, Table, TableKey};
