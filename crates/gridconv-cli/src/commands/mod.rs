pub mod export;
pub mod import;

use gridconv_batch::BatchSummary;

pub(crate) fn print_summary(summary: &BatchSummary) {
    println!(
        "{}: {} case(s) converted, {} skipped -> {}",
        summary.task.as_str(),
        summary.converted,
        summary.skipped,
        summary.output_root.display()
    );
}
