use std::path::Path;

use anyhow::Result;
use gridconv_batch::run_import_batch;
use tracing::info;

use super::print_summary;

pub fn handle(dataset: &Path) -> Result<()> {
    info!("Importing MATPOWER dataset {}", dataset.display());
    let summary = run_import_batch(dataset)?;
    print_summary(&summary);
    Ok(())
}
