//! Names side-car: `{"bus": [...], "gen": [...], ...}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gridconv_core::{GridError, GridModel, TableKey};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a names overlay was not applied. The model is left untouched in
/// every case.
#[derive(Debug, Error)]
pub enum NamesError {
    #[error("names file '{0}' not found")]
    NotFound(PathBuf),
    #[error("reading names file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed names file '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("applying names: {0}")]
    Apply(#[from] GridError),
}

/// Overlay per-table names from the names file at `path`.
///
/// Every key is validated and applied to a working copy first; `model` only
/// changes when the whole file applies cleanly.
pub fn apply_names(model: &mut GridModel, path: &Path) -> Result<(), NamesError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            NamesError::NotFound(path.to_path_buf())
        } else {
            NamesError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let malformed = |reason: String| NamesError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let root: Value = serde_json::from_str(&content).map_err(|err| malformed(err.to_string()))?;
    let Value::Object(entries) = root else {
        return Err(malformed("top level is not an object".to_string()));
    };

    let mut staged = model.clone();
    for (key, value) in entries {
        let table: TableKey = key.parse()?;
        let Value::Array(items) = value else {
            return Err(malformed(format!("'{}' is not a list", key)));
        };
        let names = items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(Some(s)),
                Value::Number(n) => Ok(Some(n.to_string())),
                Value::Null => Ok(None),
                other => Err(malformed(format!("'{}' holds a non-name value {}", key, other))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        staged.set_names(table, names)?;
    }

    *model = staged;
    Ok(())
}

/// Serialized layout of the names file; field order is the file's key order.
#[derive(Debug, Serialize)]
struct NamesFile {
    bus: Vec<String>,
    gen: Vec<String>,
    load: Vec<String>,
    line: Vec<String>,
    trafo: Vec<String>,
    ext_grid: Vec<String>,
    shunt: Vec<String>,
}

/// Write every table's names to `path`. Missing names are written as `"None"`.
pub fn write_names(model: &GridModel, path: &Path) -> Result<()> {
    let column = |key: TableKey| -> Vec<String> {
        model
            .names(key)
            .into_iter()
            .map(|name| name.unwrap_or_else(|| "None".to_string()))
            .collect()
    };
    let file = NamesFile {
        bus: column(TableKey::Bus),
        gen: column(TableKey::Gen),
        load: column(TableKey::Load),
        line: column(TableKey::Line),
        trafo: column(TableKey::Trafo),
        ext_grid: column(TableKey::ExtGrid),
        shunt: column(TableKey::Shunt),
    };
    let json = serde_json::to_string(&file).context("serializing names")?;
    fs::write(path, json).with_context(|| format!("writing names file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridconv_core::{Bus, Gen};
    use tempfile::tempdir;

    fn model() -> GridModel {
        let mut model = GridModel::new("case");
        model.bus.append(Bus::default());
        model.bus.append(Bus::default());
        model.gen.append(Gen::default());
        model
    }

    #[test]
    fn applies_strings_numbers_and_nulls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        fs::write(&path, r#"{"bus": ["A", 7], "gen": [null]}"#).unwrap();

        let mut model = model();
        apply_names(&mut model, &path).unwrap();
        assert_eq!(
            model.names(TableKey::Bus),
            vec![Some("A".to_string()), Some("7".to_string())]
        );
        assert_eq!(model.names(TableKey::Gen), vec![None]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut model = model();
        let err = apply_names(&mut model, &dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, NamesError::NotFound(_)));
    }

    #[test]
    fn partial_failure_leaves_model_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        // bus applies, gen has the wrong length
        fs::write(&path, r#"{"bus": ["A", "B"], "gen": ["G1", "G2"]}"#).unwrap();

        let mut model = model();
        let err = apply_names(&mut model, &path).unwrap_err();
        assert!(matches!(err, NamesError::Apply(_)));
        assert_eq!(model.names(TableKey::Bus), vec![None, None]);
    }

    #[test]
    fn unknown_table_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        fs::write(&path, r#"{"sgen": []}"#).unwrap();

        let err = apply_names(&mut model(), &path).unwrap_err();
        assert!(matches!(err, NamesError::Apply(GridError::UnknownTable(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = apply_names(&mut model(), &path).unwrap_err();
        assert!(matches!(err, NamesError::Malformed { .. }));
    }

    #[test]
    fn writes_all_keys_in_order_with_none_for_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        let mut model = model();
        model.bus.rows_mut()[0].name = Some("North".into());

        write_names(&model, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            r#"{"bus":["North","None"],"gen":["None"],"load":[],"line":[],"trafo":[],"ext_grid":[],"shunt":[]}"#
        );
    }
}
