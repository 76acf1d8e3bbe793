pub mod job;
pub mod runner;

pub use job::{plan_jobs, BatchJob, BatchPlan, TaskKind};
pub use runner::{run_batch, run_export_batch, run_import_batch, BatchSummary};
