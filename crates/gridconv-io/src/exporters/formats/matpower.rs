//! MATPOWER .m file writer
//!
//! Writes a [`LegacyCase`] as a MATPOWER case function. Each block is
//! truncated to the standard column count; values with no fractional part
//! are written as integer literals, everything else with six decimals.

use anyhow::{Context, Result};
use gridconv_core::idx::{BRANCH_COLS, BUS_COLS, GEN_COLS};
use gridconv_core::{CaseArray, LegacyCase};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::layout::{EXPORT_BASE_MVA, EXPORT_FUNCTION_NAME};

/// Format one matrix value.
///
/// ```
/// use gridconv_io::exporters::formats::matpower::format_value;
///
/// assert_eq!(format_value(100.0), "100");
/// assert_eq!(format_value(100.5), "100.500000");
/// assert_eq!(format_value(-0.0), "0");
/// ```
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if value.fract() == 0.0 {
        // integral values beyond i64 still print without a fraction
        if value.abs() < 9.0e15 {
            return format!("{}", value as i64);
        }
        return format!("{:.0}", value);
    }
    format!("{:.6}", value)
}

/// Write `case` to `output_path`, overwriting any existing file.
pub fn write_matpower_case(case: &LegacyCase, output_path: impl AsRef<Path>) -> Result<()> {
    let path = output_path.as_ref();
    let file =
        File::create(path).with_context(|| format!("creating output file: {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "function mpc = {}", EXPORT_FUNCTION_NAME)?;
    writeln!(out, "mpc.version = '2';")?;
    writeln!(out, "mpc.baseMVA = {};", format_value(EXPORT_BASE_MVA))?;
    writeln!(out, "mpc.bus = [")?;
    write_block(&mut out, &case.bus, BUS_COLS)?;
    writeln!(out, "mpc.gen = [")?;
    write_block(&mut out, &case.gen, GEN_COLS)?;
    writeln!(out, "mpc.branch = [")?;
    write_block(&mut out, &case.branch, BRANCH_COLS)?;

    out.flush()
        .with_context(|| format!("flushing output file: {}", path.display()))?;
    Ok(())
}

fn write_block(out: &mut impl Write, block: &CaseArray, max_cols: usize) -> Result<()> {
    for row in block.rows() {
        for value in row.iter().take(max_cols) {
            write!(out, "\t{}", format_value(*value))?;
        }
        writeln!(out, ";")?;
    }
    writeln!(out, "];")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::matpower_parser::parse_matpower_file;
    use tempfile::tempdir;

    #[test]
    fn formats_integral_and_fractional_values() {
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(-360.0), "-360");
        assert_eq!(format_value(0.9), "0.900000");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(f64::INFINITY), "Inf");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn truncates_blocks_and_reads_back() {
        let case = LegacyCase {
            bus: CaseArray::from_rows(vec![vec![
                1.0, 3.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 110.0, 1.0, 1.1, 0.9, 7.0, 8.0,
            ]]),
            gen: CaseArray::from_rows(vec![vec![1.0; 25]]),
            ..LegacyCase::default()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.m");
        write_matpower_case(&case, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("function mpc = powergrid\nmpc.version = '2';\nmpc.baseMVA = 100;\n"));
        assert!(text.contains("\t1\t3\t0\t0\t0\t0\t1\t1\t0\t110\t1\t1.100000\t0.900000;\n"));
        assert!(text.contains("mpc.branch = [\n];\n"));

        let back = parse_matpower_file(&path).unwrap();
        assert_eq!(back.bus.rows()[0].len(), BUS_COLS);
        assert_eq!(back.gen.rows()[0].len(), GEN_COLS);
        assert!(back.branch.is_empty());
    }
}
