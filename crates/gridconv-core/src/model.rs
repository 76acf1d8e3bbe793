//! Tabular grid model (pandapower layout).

use std::fmt;
use std::str::FromStr;

use crate::elements::{Bus, Element, ExtGrid, Gen, Line, Load, Shunt, Trafo};
use crate::error::{GridError, GridResult};

/// Ordered table of elements, each carrying an index label.
///
/// Index labels play the role of the pandas index: foreign keys such as
/// `Load::bus` refer to a bus label, not to a position.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<E> {
    index: Vec<usize>,
    rows: Vec<E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            index: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<E: Element> Table<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table labelled `0..n` in row order.
    pub fn from_rows(rows: Vec<E>) -> Self {
        Self {
            index: (0..rows.len()).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row with an explicit label.
    pub fn push(&mut self, label: usize, row: E) {
        self.index.push(label);
        self.rows.push(row);
    }

    /// Append a row labelled one past the current largest label.
    pub fn append(&mut self, row: E) -> usize {
        let label = self.index.iter().max().map_or(0, |max| max + 1);
        self.push(label, row);
        label
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [E] {
        &mut self.rows
    }

    pub fn names(&self) -> Vec<Option<String>> {
        self.rows.iter().map(|r| r.name().map(str::to_string)).collect()
    }

    /// Replace every row's name; `names` must have exactly one entry per row.
    pub fn set_names(&mut self, names: Vec<Option<String>>) -> GridResult<()> {
        if names.len() != self.rows.len() {
            return Err(GridError::Validation(format!(
                "expected {} names, got {}",
                self.rows.len(),
                names.len()
            )));
        }
        for (row, name) in self.rows.iter_mut().zip(names) {
            row.set_name(name);
        }
        Ok(())
    }

    /// In-service flags as 0/1 floats, in row order.
    pub fn status_vector(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| if r.in_service() { 1.0 } else { 0.0 })
            .collect()
    }

    pub fn set_all_in_service(&mut self) {
        for row in &mut self.rows {
            row.set_in_service(true);
        }
    }
}

/// The fixed set of component tables of a [`GridModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKey {
    Bus,
    Gen,
    Load,
    Line,
    Trafo,
    ExtGrid,
    Shunt,
}

impl TableKey {
    /// Every table, in names side-car order.
    pub const ALL: [TableKey; 7] = [
        TableKey::Bus,
        TableKey::Gen,
        TableKey::Load,
        TableKey::Line,
        TableKey::Trafo,
        TableKey::ExtGrid,
        TableKey::Shunt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKey::Bus => "bus",
            TableKey::Gen => "gen",
            TableKey::Load => "load",
            TableKey::Line => "line",
            TableKey::Trafo => "trafo",
            TableKey::ExtGrid => "ext_grid",
            TableKey::Shunt => "shunt",
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKey {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| GridError::UnknownTable(s.to_string()))
    }
}

/// A power grid in tabular form.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    /// Case identifier, normally the source file stem
    pub name: String,
    /// Nominal system frequency (Hz)
    pub f_hz: f64,
    /// System base power (MVA)
    pub sn_mva: f64,
    pub bus: Table<Bus>,
    pub load: Table<Load>,
    pub gen: Table<Gen>,
    pub ext_grid: Table<ExtGrid>,
    pub line: Table<Line>,
    pub trafo: Table<Trafo>,
    pub shunt: Table<Shunt>,
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            name: String::new(),
            f_hz: 50.0,
            sn_mva: 1.0,
            bus: Table::new(),
            load: Table::new(),
            gen: Table::new(),
            ext_grid: Table::new(),
            line: Table::new(),
            trafo: Table::new(),
            shunt: Table::new(),
        }
    }
}

impl GridModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn len(&self, key: TableKey) -> usize {
        match key {
            TableKey::Bus => self.bus.len(),
            TableKey::Gen => self.gen.len(),
            TableKey::Load => self.load.len(),
            TableKey::Line => self.line.len(),
            TableKey::Trafo => self.trafo.len(),
            TableKey::ExtGrid => self.ext_grid.len(),
            TableKey::Shunt => self.shunt.len(),
        }
    }

    pub fn names(&self, key: TableKey) -> Vec<Option<String>> {
        match key {
            TableKey::Bus => self.bus.names(),
            TableKey::Gen => self.gen.names(),
            TableKey::Load => self.load.names(),
            TableKey::Line => self.line.names(),
            TableKey::Trafo => self.trafo.names(),
            TableKey::ExtGrid => self.ext_grid.names(),
            TableKey::Shunt => self.shunt.names(),
        }
    }

    pub fn set_names(&mut self, key: TableKey, names: Vec<Option<String>>) -> GridResult<()> {
        let result = match key {
            TableKey::Bus => self.bus.set_names(names),
            TableKey::Gen => self.gen.set_names(names),
            TableKey::Load => self.load.set_names(names),
            TableKey::Line => self.line.set_names(names),
            TableKey::Trafo => self.trafo.set_names(names),
            TableKey::ExtGrid => self.ext_grid.set_names(names),
            TableKey::Shunt => self.shunt.set_names(names),
        };
        result.map_err(|err| GridError::Validation(format!("{} names: {}", key, err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bus_model() -> GridModel {
        let mut model = GridModel::new("case2");
        model.bus.push(
            0,
            Bus {
                name: Some("1".into()),
                vn_kv: 110.0,
                ..Bus::default()
            },
        );
        model.bus.push(
            3,
            Bus {
                name: Some("2".into()),
                vn_kv: 110.0,
                in_service: false,
                ..Bus::default()
            },
        );
        model
    }

    #[test]
    fn table_key_parses_known_names() {
        assert_eq!("ext_grid".parse::<TableKey>().unwrap(), TableKey::ExtGrid);
        assert_eq!("bus".parse::<TableKey>().unwrap(), TableKey::Bus);
        let err = "sgen".parse::<TableKey>().unwrap_err();
        assert!(matches!(err, GridError::UnknownTable(name) if name == "sgen"));
    }

    #[test]
    fn set_names_replaces_in_row_order() {
        let mut model = two_bus_model();
        model
            .set_names(TableKey::Bus, vec![Some("A".into()), Some("B".into())])
            .unwrap();
        assert_eq!(
            model.names(TableKey::Bus),
            vec![Some("A".to_string()), Some("B".to_string())]
        );
    }

    #[test]
    fn set_names_rejects_length_mismatch() {
        let mut model = two_bus_model();
        assert!(model.set_names(TableKey::Bus, vec![Some("A".into())]).is_err());
        assert_eq!(model.names(TableKey::Bus)[0].as_deref(), Some("1"));
    }

    #[test]
    fn table_keeps_labels_in_row_order() {
        let model = two_bus_model();
        assert_eq!(model.bus.index(), &[0, 3]);
        assert_eq!(model.bus.status_vector(), vec![1.0, 0.0]);
    }

    #[test]
    fn append_continues_after_largest_label() {
        let mut model = two_bus_model();
        assert_eq!(model.bus.append(Bus::default()), 4);
        assert_eq!(model.len(TableKey::Bus), 3);
    }
}
