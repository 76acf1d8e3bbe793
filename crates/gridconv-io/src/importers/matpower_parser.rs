//! MATPOWER .m file parser
//!
//! Reads the `mpc.version`, `mpc.baseMVA`, `mpc.bus`, `mpc.gen` and
//! `mpc.branch` assignments of a MATPOWER case function into a
//! [`LegacyCase`]. Other matrices (`gencost`, `areas`, `dcline`, ...) and cell
//! arrays are consumed and ignored.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use gridconv_core::idx::{BRANCH_MIN_COLS, BUS_MIN_COLS, GEN_MIN_COLS};
use gridconv_core::{CaseArray, GridError, LegacyCase};

/// Parse a MATPOWER `.m` file.
///
/// Files with any other extension (including MATLAB `.mat` containers) are
/// rejected as an unsupported format.
pub fn parse_matpower_file(path: &Path) -> Result<LegacyCase> {
    let is_m_file = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("m"))
        .unwrap_or(false);
    if !is_m_file {
        return Err(GridError::Parse(format!(
            "unsupported case format '{}': only MATPOWER .m files can be read",
            path.display()
        ))
        .into());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("reading MATPOWER file: {}", path.display()))?;
    parse_matpower_string(&content)
        .with_context(|| format!("parsing MATPOWER file: {}", path.display()))
}

/// Parse MATPOWER content from a string (single pass).
pub fn parse_matpower_string(content: &str) -> Result<LegacyCase> {
    let mut case = LegacyCase::default();
    let mut bus = None;

    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let trimmed = strip_comment(line).trim();
        let Some((lhs, rhs)) = trimmed.split_once('=') else {
            continue;
        };
        let Some(field) = lhs.trim().strip_prefix("mpc.") else {
            continue;
        };
        let field = field.trim();
        let rhs = rhs.trim();

        if rhs.starts_with('[') {
            let body = collect_block(rhs, ']', &mut lines);
            match field {
                "bus" => bus = Some(parse_matrix(&body, "bus", BUS_MIN_COLS)?),
                "gen" => case.gen = parse_matrix(&body, "gen", GEN_MIN_COLS)?,
                "branch" => case.branch = parse_matrix(&body, "branch", BRANCH_MIN_COLS)?,
                _ => {}
            }
        } else if rhs.starts_with('{') {
            collect_block(rhs, '}', &mut lines);
        } else {
            match field {
                "version" => case.version = extract_string(rhs),
                "baseMVA" => case.base_mva = extract_scalar(rhs, "baseMVA")?,
                _ => {}
            }
        }
    }

    if case.version == "1" {
        return Err(GridError::Parse(
            "MATPOWER case format version 1 is not supported".to_string(),
        )
        .into());
    }
    case.bus = bus.ok_or_else(|| GridError::Parse("mpc.bus matrix not found".to_string()))?;
    Ok(case)
}

fn strip_comment(line: &str) -> &str {
    match line.find('%') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Gather the text between the opening bracket on `first` and the matching
/// `close`, consuming continuation lines from `lines`.
fn collect_block<'a>(first: &str, close: char, lines: &mut impl Iterator<Item = &'a str>) -> String {
    let mut body = String::new();
    let after_open = &first[1..];
    if let Some(end) = after_open.find(close) {
        body.push_str(&after_open[..end]);
        return body;
    }
    body.push_str(after_open);
    for line in lines {
        let line = strip_comment(line);
        body.push('\n');
        if let Some(end) = line.find(close) {
            body.push_str(&line[..end]);
            break;
        }
        body.push_str(line);
    }
    body
}

fn extract_string(rhs: &str) -> String {
    rhs.trim_end_matches(';')
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

fn extract_scalar(rhs: &str, field: &str) -> Result<f64> {
    let raw = rhs.trim_end_matches(';').trim();
    raw.parse::<f64>()
        .map_err(|_| GridError::Parse(format!("invalid mpc.{} value '{}'", field, raw)).into())
}

/// Parse a matrix body. Rows end at `;` or a newline; values are separated
/// by whitespace or commas.
fn parse_matrix(body: &str, name: &str, min_cols: usize) -> Result<CaseArray> {
    let mut array = CaseArray::new();
    let rows = body
        .split(|c| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|row| !row.is_empty());

    for (row_idx, row) in rows.enumerate() {
        let values = row
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    GridError::Parse(format!(
                        "invalid value '{}' in mpc.{} row {}",
                        token,
                        name,
                        row_idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>, GridError>>()?;

        if values.len() < min_cols {
            return Err(GridError::Parse(format!(
                "mpc.{} row {} has {} columns; at least {} required",
                name,
                row_idx + 1,
                values.len(),
                min_cols
            ))
            .into());
        }
        array.push_row(values);
    }
    Ok(array)
}
