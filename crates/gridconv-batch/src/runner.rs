use crate::job::{plan_jobs, BatchJob, TaskKind};
use anyhow::{Context, Result};
use gridconv_io::exporters::{export_case, export_model_to_pandapower};
use gridconv_io::importers::{import_case, load_pandapower_model};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Counts returned after a run so the CLI can report what happened.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub task: TaskKind,
    pub converted: usize,
    pub skipped: usize,
    pub output_root: PathBuf,
}

/// Import every `<dataset>/matpower/*.m` case into `<dataset>_pandapower/`.
pub fn run_import_batch(dataset: &Path) -> Result<BatchSummary> {
    run_batch(dataset, TaskKind::Import)
}

/// Export every `<dataset>/*.json` model into `<dataset>_matpower/`.
pub fn run_export_batch(dataset: &Path) -> Result<BatchSummary> {
    run_batch(dataset, TaskKind::Export)
}

/// Run `task` over `dataset`.
///
/// The output root must not exist yet. Cases run in file name order and the
/// first failing case stops the run; cases converted before it stay on disk.
pub fn run_batch(dataset: &Path, task: TaskKind) -> Result<BatchSummary> {
    let plan = plan_jobs(dataset, task)?;

    fs::create_dir(&plan.output_root).with_context(|| {
        format!(
            "creating batch output root '{}'",
            plan.output_root.display()
        )
    })?;
    info!(
        task = task.as_str(),
        cases = plan.jobs.len(),
        skipped = plan.skipped,
        output = %plan.output_root.display(),
        "starting batch"
    );

    let pb = create_progress_bar(plan.jobs.len() as u64, task);
    for job in &plan.jobs {
        pb.set_message(job.case_name.clone());
        if let Err(err) = run_job(job, task) {
            pb.abandon();
            return Err(err.context(format!(
                "batch {} failed on '{}'",
                task.as_str(),
                job.input.display()
            )));
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} cases converted", plan.jobs.len()));

    Ok(BatchSummary {
        task,
        converted: plan.jobs.len(),
        skipped: plan.skipped,
        output_root: plan.output_root,
    })
}

fn run_job(job: &BatchJob, task: TaskKind) -> Result<()> {
    match task {
        TaskKind::Import => {
            let model = import_case(&job.input)?;
            export_model_to_pandapower(&model, &job.output)
        }
        TaskKind::Export => {
            let mut model = load_pandapower_model(&job.input)?;
            model.name = job.case_name.clone();
            export_case(&model, &job.output)
        }
    }
}

/// Progress bar over the case list; indicatif hides it when stderr is not a
/// terminal.
fn create_progress_bar(len: u64, task: TaskKind) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_prefix(task.as_str());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CASE: &str = "function mpc = case2
mpc.version = '2';
mpc.baseMVA = 100;
mpc.bus = [
\t1\t3\t0\t0\t0\t0\t1\t1\t0\t110\t1\t1.1\t0.9;
\t2\t1\t30\t10\t0\t-5\t1\t1\t0\t110\t1\t1.1\t0.9;
];
mpc.gen = [
\t1\t0\t0\t100\t-100\t1\t100\t1\t200\t0;
];
mpc.branch = [
\t1\t2\t0.01\t0.05\t0.02\t100\t100\t100\t0\t0\t1;
];
";

    fn dataset(root: &Path, cases: &[&str]) -> PathBuf {
        let dataset = root.join("grids");
        fs::create_dir_all(dataset.join("matpower")).unwrap();
        fs::create_dir_all(dataset.join("shunts")).unwrap();
        for name in cases {
            fs::write(dataset.join(format!("matpower/{}.m", name)), CASE).unwrap();
            fs::write(
                dataset.join(format!("shunts/{}.csv", name)),
                "bus,Bs,Gs,vn_kv,max_step,status\n1,-5.0,0.0,110.0,1,True\n",
            )
            .unwrap();
        }
        dataset
    }

    #[test]
    fn import_batch_writes_one_model_per_case() {
        let dir = tempdir().unwrap();
        let dataset = dataset(dir.path(), &["a", "b"]);
        fs::write(dataset.join("matpower/README"), "cases").unwrap();

        let summary = run_import_batch(&dataset).unwrap();
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.output_root, dir.path().join("grids_pandapower"));
        assert!(summary.output_root.join("a.json").is_file());
        assert!(summary.output_root.join("b.json").is_file());
    }

    #[test]
    fn export_batch_reads_import_output() {
        let dir = tempdir().unwrap();
        let dataset = dataset(dir.path(), &["a"]);
        let imported = run_import_batch(&dataset).unwrap();

        let summary = run_export_batch(&imported.output_root).unwrap();
        assert_eq!(summary.converted, 1);
        let root = dir.path().join("grids_pandapower_matpower");
        assert_eq!(summary.output_root, root);
        assert!(root.join("matpower/a.m").is_file());
        assert!(root.join("names/a.json").is_file());
        assert!(root.join("shunts/a.csv").is_file());
    }

    #[test]
    fn existing_output_root_is_an_error() {
        let dir = tempdir().unwrap();
        let dataset = dataset(dir.path(), &["a"]);
        run_import_batch(&dataset).unwrap();

        let err = run_import_batch(&dataset).unwrap_err();
        assert!(err.to_string().contains("creating batch output root"));
    }

    #[test]
    fn first_failing_case_stops_the_batch() {
        let dir = tempdir().unwrap();
        let dataset = dataset(dir.path(), &["a", "c"]);
        fs::write(dataset.join("matpower/b.m"), "mpc.bus = [\n1 2;\n];\n").unwrap();

        let err = run_import_batch(&dataset).unwrap_err();
        assert!(err.to_string().contains("b.m"));
        let root = dir.path().join("grids_pandapower");
        assert!(root.join("a.json").is_file());
        assert!(!root.join("c.json").exists());
    }
}
