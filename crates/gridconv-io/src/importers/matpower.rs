//! Import a MATPOWER case, with its shunts and names side-cars, as a grid
//! model.

use std::path::Path;

use anyhow::{Context, Result};
use gridconv_core::idx::{BUS_TYPE, PQ, PV, VMAX, VMIN};
use gridconv_core::{GridModel, LegacyCase};
use tracing::{debug, info, warn};

use super::matpower_parser::parse_matpower_file;
use crate::convert::from_ppc;
use crate::layout::{case_stem, sidecar_path, IMPORT_VMAX, IMPORT_VMIN, NAMES_DIR, SHUNTS_DIR};
use crate::sidecar::{apply_names, calibrate_shunts, read_shunts, NamesError};

/// Import the case at `path` (`<root>/matpower/<case>.m`).
///
/// The shunts side-car `<root>/shunts/<case>.csv` is required. The names
/// side-car `<root>/names/<case>.json` is optional: any problem with it is
/// logged and the converted default names are kept.
pub fn import_case(path: &Path) -> Result<GridModel> {
    let mut case = parse_matpower_file(path)?;
    normalize_buses(&mut case);

    let mut model =
        from_ppc(&case).with_context(|| format!("converting case '{}'", path.display()))?;

    let shunts_path = sidecar_path(path, SHUNTS_DIR, "csv");
    let records = read_shunts(&shunts_path)?;
    calibrate_shunts(&mut model, records);

    let names_path = sidecar_path(path, NAMES_DIR, "json");
    match apply_names(&mut model, &names_path) {
        Ok(()) => debug!(path = %names_path.display(), "applied names overlay"),
        Err(err @ NamesError::NotFound(_)) => debug!("skipping names overlay: {}", err),
        Err(err) => warn!("skipping names overlay: {:#}", anyhow::Error::from(err)),
    }

    model.name = case_stem(path);
    info!(case = %model.name, buses = model.bus.len(), "imported MATPOWER case");
    Ok(model)
}

/// PQ buses become PV buses and every bus gets the import voltage bounds.
fn normalize_buses(case: &mut LegacyCase) {
    case.bus
        .map_column(BUS_TYPE, |kind| if kind == PQ { PV } else { kind });
    case.bus.map_column(VMAX, |_| IMPORT_VMAX);
    case.bus.map_column(VMIN, |_| IMPORT_VMIN);
}
