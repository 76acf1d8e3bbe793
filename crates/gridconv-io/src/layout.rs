//! On-disk layout of a converted dataset and the fixed conversion constants.
//!
//! ```text
//! <root>/
//!   matpower/<case>.m
//!   names/<case>.json
//!   shunts/<case>.csv
//! ```
//!
//! Side-car files are found from a case path by going up two levels
//! (`<root>/matpower/<case>.m` -> `<root>`) and down into the side-car
//! directory.

use std::path::{Path, PathBuf};

pub const MATPOWER_DIR: &str = "matpower";
pub const NAMES_DIR: &str = "names";
pub const SHUNTS_DIR: &str = "shunts";

/// Voltage bounds forced onto every bus on import (p.u.).
pub const IMPORT_VMAX: f64 = 1.1;
pub const IMPORT_VMIN: f64 = 0.9;

/// System base written into exported cases (MVA).
pub const EXPORT_BASE_MVA: f64 = 100.0;
pub const EXPORT_FUNCTION_NAME: &str = "powergrid";

/// Nominal frequency of models built from legacy cases (Hz).
pub const DEFAULT_F_HZ: f64 = 50.0;

/// Name given to every shunt rebuilt from the shunts side-car.
pub const SHUNT_DEFAULT_NAME: &str = "0";

/// File stem of a case path, used as the case name.
pub fn case_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<case dir>/../<dir>/<stem>.<ext>` for a case file at `case_path`.
pub fn sidecar_path(case_path: &Path, dir: &str, ext: &str) -> PathBuf {
    let root = case_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    root.join(dir)
        .join(format!("{}.{}", case_stem(case_path), ext))
}
