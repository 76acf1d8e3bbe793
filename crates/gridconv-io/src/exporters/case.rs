//! Export a grid model as a MATPOWER case plus names and shunts side-cars.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gridconv_core::idx::{BR_STATUS, GEN_STATUS};
use gridconv_core::GridModel;
use tracing::{debug, info};

use super::formats::write_matpower_case;
use crate::convert::to_ppc;
use crate::layout::{EXPORT_BASE_MVA, MATPOWER_DIR, NAMES_DIR, SHUNTS_DIR};
use crate::sidecar::{shunt_records, write_names, write_shunts};

/// Write `<root>/matpower/<name>.m`, `<root>/names/<name>.json` and
/// `<root>/shunts/<name>.csv` for `model`.
///
/// Out-of-service generators, external grids, lines and transformers are
/// kept as rows with status 0, so row order matches the model tables. The
/// side-car directories are created when missing and existing files for the
/// same case name are overwritten. `model` itself is not modified.
pub fn export_case(model: &GridModel, output_root: &Path) -> Result<()> {
    if model.name.is_empty() {
        return Err(anyhow!("cannot export a model without a name"));
    }

    let matpower_dir = output_root.join(MATPOWER_DIR);
    let names_dir = output_root.join(NAMES_DIR);
    let shunts_dir = output_root.join(SHUNTS_DIR);
    for dir in [&matpower_dir, &names_dir, &shunts_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory: {}", dir.display()))?;
    }

    let mut net = model.clone();
    net.sn_mva = EXPORT_BASE_MVA;

    let gen_status = [net.ext_grid.status_vector(), net.gen.status_vector()].concat();
    let branch_status = [net.line.status_vector(), net.trafo.status_vector()].concat();

    net.gen.set_all_in_service();
    net.ext_grid.set_all_in_service();
    net.line.set_all_in_service();
    net.trafo.set_all_in_service();

    let mut case = to_ppc(&net).with_context(|| format!("converting model '{}'", net.name))?;
    case.gen
        .set_column(GEN_STATUS, &gen_status)
        .context("restoring generator status")?;
    case.branch
        .set_column(BR_STATUS, &branch_status)
        .context("restoring branch status")?;
    debug!(
        gens_out = gen_status.iter().filter(|s| **s == 0.0).count(),
        branches_out = branch_status.iter().filter(|s| **s == 0.0).count(),
        "restored out-of-service status"
    );

    let records = shunt_records(&net);

    write_matpower_case(&case, matpower_dir.join(format!("{}.m", net.name)))?;
    write_names(&net, &names_dir.join(format!("{}.json", net.name)))?;
    write_shunts(&shunts_dir.join(format!("{}.csv", net.name)), &records)?;

    info!(case = %net.name, root = %output_root.display(), "exported MATPOWER case");
    Ok(())
}
