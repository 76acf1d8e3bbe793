use std::path::Path;

use anyhow::Result;
use gridconv_batch::run_export_batch;
use tracing::info;

use super::print_summary;

pub fn handle(dataset: &Path) -> Result<()> {
    info!("Exporting pandapower dataset {}", dataset.display());
    let summary = run_export_batch(dataset)?;
    print_summary(&summary);
    Ok(())
}
