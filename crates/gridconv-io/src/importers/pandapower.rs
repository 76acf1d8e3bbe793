//! pandapower JSON model reader
//!
//! pandapower stores a network as a `pandapowerNet` envelope whose tables are
//! pandas DataFrames serialized in split orientation, each embedded as a JSON
//! string. Tables that are absent load as empty; columns that are absent take
//! pandapower's creation defaults.
//!
//! Reference: <https://pandapower.readthedocs.io/en/latest/file_io.html>

use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context, Result};
use gridconv_core::{Bus, Element, ExtGrid, Gen, GridModel, Line, Load, Shunt, Table, Trafo};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::helpers::{safe_f64_to_usize, safe_u64_to_usize};

/// Top-level pandapower JSON structure
#[derive(Debug, Deserialize)]
struct PandapowerJson {
    #[serde(rename = "_object")]
    object: PandapowerNet,
}

/// The pandapower network container
#[derive(Debug, Deserialize)]
struct PandapowerNet {
    name: Option<Value>,
    f_hz: Option<f64>,
    sn_mva: Option<f64>,
    bus: Option<DataFrameJson>,
    load: Option<DataFrameJson>,
    gen: Option<DataFrameJson>,
    ext_grid: Option<DataFrameJson>,
    line: Option<DataFrameJson>,
    trafo: Option<DataFrameJson>,
    shunt: Option<DataFrameJson>,
    // std_types, result tables, controllers, ...
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

/// A serialized pandas DataFrame
#[derive(Debug, Deserialize)]
struct DataFrameJson {
    /// The DataFrame content as a JSON string
    #[serde(rename = "_object")]
    object: String,
}

/// Parsed DataFrame content (split orientation)
#[derive(Debug, Deserialize)]
struct DataFrameContent {
    columns: Vec<String>,
    index: Vec<Value>,
    data: Vec<Vec<Value>>,
}

impl DataFrameJson {
    fn parse_content(&self, table: &str) -> Result<DataFrameContent> {
        serde_json::from_str(&self.object)
            .with_context(|| format!("parsing '{}' DataFrame content", table))
    }
}

/// Borrowed view into a parsed DataFrame with O(1) column lookup.
struct DataFrameView<'a> {
    table: &'a str,
    index: &'a [Value],
    data: &'a [Vec<Value>],
    col_map: HashMap<&'a str, usize>,
}

impl<'a> DataFrameView<'a> {
    fn new(table: &'a str, content: &'a DataFrameContent) -> Self {
        let col_map = content
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        Self {
            table,
            index: &content.index,
            data: &content.data,
            col_map,
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    /// The pandas index label of a row (not its position)
    fn label(&self, row: usize) -> Result<usize> {
        match self.index.get(row) {
            Some(value) => value_to_usize(value).ok_or_else(|| {
                anyhow!("{} row {} has invalid index label {}", self.table, row, value)
            }),
            None => Ok(row),
        }
    }

    fn get(&self, row: usize, col: &str) -> Option<&'a Value> {
        let col_idx = self.col_map.get(col)?;
        self.data.get(row)?.get(*col_idx)
    }

    /// Missing or null cells read as NaN, like an empty pandas float cell.
    fn f64_or(&self, row: usize, col: &str, default: f64) -> f64 {
        match self.get(row, col) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::Null) => f64::NAN,
            _ => default,
        }
    }

    fn bool_or(&self, row: usize, col: &str, default: bool) -> bool {
        match self.get(row, col) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
            _ => default,
        }
    }

    fn u32_or(&self, row: usize, col: &str, default: u32) -> u32 {
        self.get(row, col)
            .and_then(value_to_usize)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn string(&self, row: usize, col: &str) -> Option<String> {
        match self.get(row, col)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn string_or(&self, row: usize, col: &str, default: Option<String>) -> Option<String> {
        match self.get(row, col) {
            Some(Value::Null) => None,
            Some(_) => self.string(row, col),
            None => default,
        }
    }

    /// A required bus reference.
    fn bus_ref(&self, row: usize, col: &str) -> Result<usize> {
        self.get(row, col)
            .and_then(value_to_usize)
            .ok_or_else(|| anyhow!("{} row {} has no valid '{}'", self.table, row, col))
    }

    /// A bus reference that may be null.
    fn opt_bus_ref(&self, row: usize, col: &str) -> Result<Option<usize>> {
        match self.get(row, col) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.bus_ref(row, col).map(Some),
        }
    }
}

fn value_to_usize(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => safe_u64_to_usize(v).ok(),
            None => n.as_f64().and_then(|v| safe_f64_to_usize(v).ok()),
        },
        _ => None,
    }
}

/// Load a pandapower JSON file into a [`GridModel`].
pub fn load_pandapower_model(path: &Path) -> Result<GridModel> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading pandapower JSON file '{}'", path.display()))?;
    let pp: PandapowerJson = serde_json::from_str(&content)
        .with_context(|| format!("parsing pandapower JSON from '{}'", path.display()))?;
    build_model(&pp.object).with_context(|| format!("building model from '{}'", path.display()))
}

fn build_model(net: &PandapowerNet) -> Result<GridModel> {
    let mut model = GridModel::default();
    if let Some(Value::String(name)) = &net.name {
        model.name = name.clone();
    }
    if let Some(f_hz) = net.f_hz {
        model.f_hz = f_hz;
    }
    if let Some(sn_mva) = net.sn_mva {
        model.sn_mva = sn_mva;
    }

    model.bus = read_table("bus", net.bus.as_ref(), |v, r| {
        let d = Bus::default();
        Ok(Bus {
            name: v.string_or(r, "name", None),
            vn_kv: v.f64_or(r, "vn_kv", d.vn_kv),
            kind: v.string_or(r, "type", Some(d.kind)).unwrap_or_default(),
            zone: v.get(r, "zone").and_then(Value::as_f64),
            in_service: v.bool_or(r, "in_service", d.in_service),
            max_vm_pu: v.f64_or(r, "max_vm_pu", d.max_vm_pu),
            min_vm_pu: v.f64_or(r, "min_vm_pu", d.min_vm_pu),
        })
    })?;

    model.load = read_table("load", net.load.as_ref(), |v, r| {
        let d = Load::default();
        Ok(Load {
            name: v.string_or(r, "name", None),
            bus: v.bus_ref(r, "bus")?,
            p_mw: v.f64_or(r, "p_mw", d.p_mw),
            q_mvar: v.f64_or(r, "q_mvar", d.q_mvar),
            const_z_percent: v.f64_or(r, "const_z_percent", d.const_z_percent),
            const_i_percent: v.f64_or(r, "const_i_percent", d.const_i_percent),
            sn_mva: v.f64_or(r, "sn_mva", d.sn_mva),
            scaling: v.f64_or(r, "scaling", d.scaling),
            in_service: v.bool_or(r, "in_service", d.in_service),
            kind: v.string_or(r, "type", d.kind),
        })
    })?;

    model.gen = read_table("gen", net.gen.as_ref(), |v, r| {
        let d = Gen::default();
        Ok(Gen {
            name: v.string_or(r, "name", None),
            bus: v.bus_ref(r, "bus")?,
            p_mw: v.f64_or(r, "p_mw", d.p_mw),
            vm_pu: v.f64_or(r, "vm_pu", d.vm_pu),
            sn_mva: v.f64_or(r, "sn_mva", d.sn_mva),
            min_q_mvar: v.f64_or(r, "min_q_mvar", d.min_q_mvar),
            max_q_mvar: v.f64_or(r, "max_q_mvar", d.max_q_mvar),
            scaling: v.f64_or(r, "scaling", d.scaling),
            slack: v.bool_or(r, "slack", d.slack),
            in_service: v.bool_or(r, "in_service", d.in_service),
            kind: v.string_or(r, "type", d.kind),
            controllable: v.bool_or(r, "controllable", d.controllable),
            max_p_mw: v.f64_or(r, "max_p_mw", d.max_p_mw),
            min_p_mw: v.f64_or(r, "min_p_mw", d.min_p_mw),
        })
    })?;

    model.ext_grid = read_table("ext_grid", net.ext_grid.as_ref(), |v, r| {
        let d = ExtGrid::default();
        Ok(ExtGrid {
            name: v.string_or(r, "name", None),
            bus: v.bus_ref(r, "bus")?,
            vm_pu: v.f64_or(r, "vm_pu", d.vm_pu),
            va_degree: v.f64_or(r, "va_degree", d.va_degree),
            in_service: v.bool_or(r, "in_service", d.in_service),
            max_p_mw: v.f64_or(r, "max_p_mw", d.max_p_mw),
            min_p_mw: v.f64_or(r, "min_p_mw", d.min_p_mw),
            max_q_mvar: v.f64_or(r, "max_q_mvar", d.max_q_mvar),
            min_q_mvar: v.f64_or(r, "min_q_mvar", d.min_q_mvar),
        })
    })?;

    model.line = read_table("line", net.line.as_ref(), |v, r| {
        let d = Line::default();
        Ok(Line {
            name: v.string_or(r, "name", None),
            std_type: v.string_or(r, "std_type", None),
            from_bus: v.bus_ref(r, "from_bus")?,
            to_bus: v.bus_ref(r, "to_bus")?,
            length_km: v.f64_or(r, "length_km", d.length_km),
            r_ohm_per_km: v.f64_or(r, "r_ohm_per_km", d.r_ohm_per_km),
            x_ohm_per_km: v.f64_or(r, "x_ohm_per_km", d.x_ohm_per_km),
            c_nf_per_km: v.f64_or(r, "c_nf_per_km", d.c_nf_per_km),
            g_us_per_km: v.f64_or(r, "g_us_per_km", d.g_us_per_km),
            max_i_ka: v.f64_or(r, "max_i_ka", d.max_i_ka),
            df: v.f64_or(r, "df", d.df),
            parallel: v.u32_or(r, "parallel", d.parallel),
            kind: v.string_or(r, "type", d.kind),
            in_service: v.bool_or(r, "in_service", d.in_service),
            max_loading_percent: v.f64_or(r, "max_loading_percent", d.max_loading_percent),
        })
    })?;

    model.trafo = read_table("trafo", net.trafo.as_ref(), |v, r| {
        let d = Trafo::default();
        Ok(Trafo {
            name: v.string_or(r, "name", None),
            std_type: v.string_or(r, "std_type", None),
            hv_bus: v.bus_ref(r, "hv_bus")?,
            lv_bus: v.bus_ref(r, "lv_bus")?,
            sn_mva: v.f64_or(r, "sn_mva", d.sn_mva),
            vn_hv_kv: v.f64_or(r, "vn_hv_kv", d.vn_hv_kv),
            vn_lv_kv: v.f64_or(r, "vn_lv_kv", d.vn_lv_kv),
            vk_percent: v.f64_or(r, "vk_percent", d.vk_percent),
            vkr_percent: v.f64_or(r, "vkr_percent", d.vkr_percent),
            pfe_kw: v.f64_or(r, "pfe_kw", d.pfe_kw),
            i0_percent: v.f64_or(r, "i0_percent", d.i0_percent),
            shift_degree: v.f64_or(r, "shift_degree", d.shift_degree),
            tap_side: v.string_or(r, "tap_side", d.tap_side),
            tap_neutral: v.f64_or(r, "tap_neutral", d.tap_neutral),
            tap_min: v.f64_or(r, "tap_min", d.tap_min),
            tap_max: v.f64_or(r, "tap_max", d.tap_max),
            tap_step_percent: v.f64_or(r, "tap_step_percent", d.tap_step_percent),
            tap_step_degree: v.f64_or(r, "tap_step_degree", d.tap_step_degree),
            tap_pos: v.f64_or(r, "tap_pos", d.tap_pos),
            tap_phase_shifter: v.bool_or(r, "tap_phase_shifter", d.tap_phase_shifter),
            parallel: v.u32_or(r, "parallel", d.parallel),
            df: v.f64_or(r, "df", d.df),
            in_service: v.bool_or(r, "in_service", d.in_service),
            max_loading_percent: v.f64_or(r, "max_loading_percent", d.max_loading_percent),
        })
    })?;

    model.shunt = read_table("shunt", net.shunt.as_ref(), |v, r| {
        let d = Shunt::default();
        Ok(Shunt {
            name: v.string_or(r, "name", None),
            bus: v.opt_bus_ref(r, "bus")?,
            q_mvar: v.f64_or(r, "q_mvar", d.q_mvar),
            p_mw: v.f64_or(r, "p_mw", d.p_mw),
            vn_kv: v.f64_or(r, "vn_kv", d.vn_kv),
            step: v.f64_or(r, "step", d.step),
            max_step: v.u32_or(r, "max_step", d.max_step),
            in_service: v.bool_or(r, "in_service", d.in_service),
        })
    })?;

    debug!(
        buses = model.bus.len(),
        lines = model.line.len(),
        trafos = model.trafo.len(),
        "loaded pandapower model"
    );
    Ok(model)
}

fn read_table<E: Element>(
    table: &str,
    frame: Option<&DataFrameJson>,
    read_row: impl Fn(&DataFrameView, usize) -> Result<E>,
) -> Result<Table<E>> {
    let mut out = Table::new();
    let Some(frame) = frame else {
        return Ok(out);
    };
    let content = frame.parse_content(table)?;
    let view = DataFrameView::new(table, &content);
    for row in 0..view.len() {
        out.push(view.label(row)?, read_row(&view, row)?);
    }
    Ok(out)
}
