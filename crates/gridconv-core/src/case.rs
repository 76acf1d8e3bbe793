//! Legacy MATPOWER case ("ppc") representation.
//!
//! A [`LegacyCase`] holds the three numeric blocks of a MATPOWER case as
//! row-major arrays. Columns are addressed with the constants in
//! [`crate::idx`]; row order is the only link between a legacy row and the
//! grid model element built from it.

use crate::error::{GridError, GridResult};

/// An ordered block of numeric rows addressed by fixed column positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseArray {
    rows: Vec<Vec<f64>>,
}

impl CaseArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Copy of one column. Rows too short to hold the column yield `0.0`.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.get(col).copied().unwrap_or(0.0))
            .collect()
    }

    /// Overwrite one column with `values`, one value per row.
    ///
    /// Fails without touching the array when the value count differs from the
    /// row count or when any row is too short to hold `col`.
    pub fn set_column(&mut self, col: usize, values: &[f64]) -> GridResult<()> {
        if values.len() != self.rows.len() {
            return Err(GridError::Validation(format!(
                "column {} expects {} values, got {}",
                col,
                self.rows.len(),
                values.len()
            )));
        }
        if let Some(pos) = self.rows.iter().position(|r| r.len() <= col) {
            return Err(GridError::Validation(format!(
                "row {} has {} columns; cannot write column {}",
                pos,
                self.rows[pos].len(),
                col
            )));
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = *value;
        }
        Ok(())
    }

    /// Rewrite every value of one column in place. Short rows are left as-is.
    pub fn map_column(&mut self, col: usize, mut f: impl FnMut(f64) -> f64) {
        for row in &mut self.rows {
            if let Some(value) = row.get_mut(col) {
                *value = f(*value);
            }
        }
    }
}

/// MATPOWER case: version tag, system base and the `bus`/`gen`/`branch` blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyCase {
    pub version: String,
    pub base_mva: f64,
    pub bus: CaseArray,
    pub gen: CaseArray,
    pub branch: CaseArray,
}

impl Default for LegacyCase {
    fn default() -> Self {
        Self {
            version: "2".to_string(),
            base_mva: 100.0,
            bus: CaseArray::new(),
            gen: CaseArray::new(),
            branch: CaseArray::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idx::{BUS_TYPE, GEN_STATUS};

    fn sample() -> CaseArray {
        CaseArray::from_rows(vec![
            vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 100.0, 0.0, 1.0],
            vec![2.0, 2.0, 0.0, 0.0, 0.0, 0.0, 1.0, 100.0, 1.0, 1.0],
        ])
    }

    #[test]
    fn set_column_overwrites_in_row_order() {
        let mut gen = sample();
        gen.set_column(GEN_STATUS, &[0.0, 1.0]).unwrap();
        assert_eq!(gen.column(GEN_STATUS), vec![0.0, 1.0]);
    }

    #[test]
    fn set_column_rejects_length_mismatch() {
        let mut gen = sample();
        let err = gen.set_column(GEN_STATUS, &[0.0]).unwrap_err();
        assert!(matches!(err, GridError::Validation(_)));
        assert_eq!(gen.column(GEN_STATUS), vec![100.0, 100.0]);
    }

    #[test]
    fn set_column_rejects_short_rows() {
        let mut gen = sample();
        assert!(gen.set_column(42, &[0.0, 0.0]).is_err());
    }

    #[test]
    fn map_column_rewrites_matching_values() {
        let mut bus = sample();
        bus.map_column(BUS_TYPE, |t| if t == 1.0 { 2.0 } else { t });
        assert_eq!(bus.column(BUS_TYPE), vec![2.0, 2.0]);
    }
}
