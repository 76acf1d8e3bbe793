use anyhow::{Context, Result};
use gridconv_io::layout::MATPOWER_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Direction of a batch conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// `<dataset>/matpower/*.m` -> `<dataset>_pandapower/*.json`
    Import,
    /// `<dataset>/*.json` -> `<dataset>_matpower/{matpower,names,shunts}/`
    Export,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Import => "import",
            TaskKind::Export => "export",
        }
    }

    /// Extension of the files the task converts.
    pub fn input_extension(&self) -> &'static str {
        match self {
            TaskKind::Import => "m",
            TaskKind::Export => "json",
        }
    }

    pub fn input_dir(&self, dataset: &Path) -> PathBuf {
        match self {
            TaskKind::Import => dataset.join(MATPOWER_DIR),
            TaskKind::Export => dataset.to_path_buf(),
        }
    }

    /// Sibling of `dataset` named `<dataset>_pandapower` or `<dataset>_matpower`.
    pub fn output_root(&self, dataset: &Path) -> PathBuf {
        let suffix = match self {
            TaskKind::Import => "_pandapower",
            TaskKind::Export => "_matpower",
        };
        // components() drops a trailing separator
        let mut root = dataset.components().as_path().as_os_str().to_os_string();
        root.push(suffix);
        PathBuf::from(root)
    }
}

#[derive(Debug, Clone)]
pub struct BatchJob {
    pub case_name: String,
    pub input: PathBuf,
    /// JSON file for imports; output root for exports.
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub task: TaskKind,
    pub output_root: PathBuf,
    pub jobs: Vec<BatchJob>,
    pub skipped: usize,
}

/// List the task's input directory and build one job per matching file,
/// sorted by file name. Entries with another extension are counted as
/// skipped.
pub fn plan_jobs(dataset: &Path, task: TaskKind) -> Result<BatchPlan> {
    let input_dir = task.input_dir(dataset);
    let output_root = task.output_root(dataset);

    let mut inputs = Vec::new();
    let mut skipped = 0;
    let entries = fs::read_dir(&input_dir)
        .with_context(|| format!("listing input directory '{}'", input_dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("listing input directory '{}'", input_dir.display()))?
            .path();
        let matches = path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(task.input_extension());
        if matches {
            inputs.push(path);
        } else {
            debug!(path = %path.display(), "skipping entry");
            skipped += 1;
        }
    }
    inputs.sort();

    let jobs = inputs
        .into_iter()
        .map(|input| {
            let case_name = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = match task {
                TaskKind::Import => output_root.join(format!("{}.json", case_name)),
                TaskKind::Export => output_root.clone(),
            };
            BatchJob {
                case_name,
                input,
                output,
            }
        })
        .collect();

    Ok(BatchPlan {
        task,
        output_root,
        jobs,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_root_is_dataset_sibling() {
        assert_eq!(
            TaskKind::Import.output_root(Path::new("data/train")),
            PathBuf::from("data/train_pandapower")
        );
        assert_eq!(
            TaskKind::Export.output_root(Path::new("data/train/")),
            PathBuf::from("data/train_matpower")
        );
    }

    #[test]
    fn plan_sorts_inputs_and_counts_skipped() {
        let dir = tempdir().unwrap();
        let matpower = dir.path().join("matpower");
        fs::create_dir(&matpower).unwrap();
        for name in ["case30.m", "case14.m", "notes.txt"] {
            fs::write(matpower.join(name), "").unwrap();
        }
        fs::create_dir(matpower.join("nested.m")).unwrap();

        let plan = plan_jobs(dir.path(), TaskKind::Import).unwrap();
        let names: Vec<_> = plan.jobs.iter().map(|j| j.case_name.as_str()).collect();
        assert_eq!(names, ["case14", "case30"]);
        assert_eq!(plan.skipped, 2);
        assert!(plan.jobs[0].output.ends_with("case14.json"));
    }

    #[test]
    fn missing_input_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let err = plan_jobs(dir.path(), TaskKind::Import).unwrap_err();
        assert!(err.to_string().contains("listing input directory"));
    }
}
