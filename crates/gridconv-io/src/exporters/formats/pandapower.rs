//! pandapower JSON exporter
//!
//! Writes every table of a [`GridModel`] in the envelope read by
//! [`crate::importers::pandapower::load_pandapower_model`].

use anyhow::{Context, Result};
use gridconv_core::{Element, GridModel, Table};
use serde::Serialize;
use serde_json::{json, Map, Number, Value};
use std::{fs, path::Path};

#[derive(Serialize)]
struct DataFrameObject {
    columns: Vec<String>,
    index: Vec<usize>,
    data: Vec<Vec<Value>>,
}

fn f64_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn str_value(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

fn index_value(value: usize) -> Value {
    Value::Number(Number::from(value))
}

/// Column name and pandas dtype, in pandapower column order.
type Schema = &'static [(&'static str, &'static str)];

const BUS_SCHEMA: Schema = &[
    ("name", "object"),
    ("vn_kv", "float64"),
    ("type", "object"),
    ("zone", "object"),
    ("in_service", "bool"),
    ("max_vm_pu", "float64"),
    ("min_vm_pu", "float64"),
];

const LOAD_SCHEMA: Schema = &[
    ("name", "object"),
    ("bus", "uint32"),
    ("p_mw", "float64"),
    ("q_mvar", "float64"),
    ("const_z_percent", "float64"),
    ("const_i_percent", "float64"),
    ("sn_mva", "float64"),
    ("scaling", "float64"),
    ("in_service", "bool"),
    ("type", "object"),
];

const GEN_SCHEMA: Schema = &[
    ("name", "object"),
    ("bus", "uint32"),
    ("p_mw", "float64"),
    ("vm_pu", "float64"),
    ("sn_mva", "float64"),
    ("min_q_mvar", "float64"),
    ("max_q_mvar", "float64"),
    ("scaling", "float64"),
    ("slack", "bool"),
    ("in_service", "bool"),
    ("type", "object"),
    ("controllable", "bool"),
    ("max_p_mw", "float64"),
    ("min_p_mw", "float64"),
];

const EXT_GRID_SCHEMA: Schema = &[
    ("name", "object"),
    ("bus", "uint32"),
    ("vm_pu", "float64"),
    ("va_degree", "float64"),
    ("in_service", "bool"),
    ("max_p_mw", "float64"),
    ("min_p_mw", "float64"),
    ("max_q_mvar", "float64"),
    ("min_q_mvar", "float64"),
];

const LINE_SCHEMA: Schema = &[
    ("name", "object"),
    ("std_type", "object"),
    ("from_bus", "uint32"),
    ("to_bus", "uint32"),
    ("length_km", "float64"),
    ("r_ohm_per_km", "float64"),
    ("x_ohm_per_km", "float64"),
    ("c_nf_per_km", "float64"),
    ("g_us_per_km", "float64"),
    ("max_i_ka", "float64"),
    ("df", "float64"),
    ("parallel", "uint32"),
    ("type", "object"),
    ("in_service", "bool"),
    ("max_loading_percent", "float64"),
];

const TRAFO_SCHEMA: Schema = &[
    ("name", "object"),
    ("std_type", "object"),
    ("hv_bus", "uint32"),
    ("lv_bus", "uint32"),
    ("sn_mva", "float64"),
    ("vn_hv_kv", "float64"),
    ("vn_lv_kv", "float64"),
    ("vk_percent", "float64"),
    ("vkr_percent", "float64"),
    ("pfe_kw", "float64"),
    ("i0_percent", "float64"),
    ("shift_degree", "float64"),
    ("tap_side", "object"),
    ("tap_neutral", "float64"),
    ("tap_min", "float64"),
    ("tap_max", "float64"),
    ("tap_step_percent", "float64"),
    ("tap_step_degree", "float64"),
    ("tap_pos", "float64"),
    ("tap_phase_shifter", "bool"),
    ("parallel", "uint32"),
    ("df", "float64"),
    ("in_service", "bool"),
    ("max_loading_percent", "float64"),
];

const SHUNT_SCHEMA: Schema = &[
    ("bus", "uint32"),
    ("name", "object"),
    ("q_mvar", "float64"),
    ("p_mw", "float64"),
    ("vn_kv", "float64"),
    ("step", "float64"),
    ("max_step", "uint32"),
    ("in_service", "bool"),
];

fn make_dataframe<E: Element>(
    schema: Schema,
    table: &Table<E>,
    row: impl Fn(&E) -> Vec<Value>,
) -> Result<Value> {
    let object = DataFrameObject {
        columns: schema.iter().map(|(name, _)| name.to_string()).collect(),
        index: table.index().to_vec(),
        data: table.rows().iter().map(row).collect(),
    };
    let dtype: Map<String, Value> = schema
        .iter()
        .map(|(name, dtype)| (name.to_string(), Value::String(dtype.to_string())))
        .collect();
    let obj_str = serde_json::to_string(&object)?;
    Ok(json!({
        "_module": "pandas.core.frame",
        "_class": "DataFrame",
        "_object": obj_str,
        "orient": "split",
        "dtype": dtype,
        "is_multiindex": false,
        "is_multicolumn": false,
    }))
}

/// Export a model to pandapower-style JSON
pub fn export_model_to_pandapower(model: &GridModel, output_path: impl AsRef<Path>) -> Result<()> {
    let path = output_path.as_ref();

    let bus = make_dataframe(BUS_SCHEMA, &model.bus, |b| {
        vec![
            str_value(&b.name),
            f64_value(b.vn_kv),
            Value::String(b.kind.clone()),
            b.zone.map(f64_value).unwrap_or(Value::Null),
            Value::Bool(b.in_service),
            f64_value(b.max_vm_pu),
            f64_value(b.min_vm_pu),
        ]
    })?;

    let load = make_dataframe(LOAD_SCHEMA, &model.load, |l| {
        vec![
            str_value(&l.name),
            index_value(l.bus),
            f64_value(l.p_mw),
            f64_value(l.q_mvar),
            f64_value(l.const_z_percent),
            f64_value(l.const_i_percent),
            f64_value(l.sn_mva),
            f64_value(l.scaling),
            Value::Bool(l.in_service),
            str_value(&l.kind),
        ]
    })?;

    let gen = make_dataframe(GEN_SCHEMA, &model.gen, |g| {
        vec![
            str_value(&g.name),
            index_value(g.bus),
            f64_value(g.p_mw),
            f64_value(g.vm_pu),
            f64_value(g.sn_mva),
            f64_value(g.min_q_mvar),
            f64_value(g.max_q_mvar),
            f64_value(g.scaling),
            Value::Bool(g.slack),
            Value::Bool(g.in_service),
            str_value(&g.kind),
            Value::Bool(g.controllable),
            f64_value(g.max_p_mw),
            f64_value(g.min_p_mw),
        ]
    })?;

    let ext_grid = make_dataframe(EXT_GRID_SCHEMA, &model.ext_grid, |e| {
        vec![
            str_value(&e.name),
            index_value(e.bus),
            f64_value(e.vm_pu),
            f64_value(e.va_degree),
            Value::Bool(e.in_service),
            f64_value(e.max_p_mw),
            f64_value(e.min_p_mw),
            f64_value(e.max_q_mvar),
            f64_value(e.min_q_mvar),
        ]
    })?;

    let line = make_dataframe(LINE_SCHEMA, &model.line, |l| {
        vec![
            str_value(&l.name),
            str_value(&l.std_type),
            index_value(l.from_bus),
            index_value(l.to_bus),
            f64_value(l.length_km),
            f64_value(l.r_ohm_per_km),
            f64_value(l.x_ohm_per_km),
            f64_value(l.c_nf_per_km),
            f64_value(l.g_us_per_km),
            f64_value(l.max_i_ka),
            f64_value(l.df),
            Value::from(l.parallel),
            str_value(&l.kind),
            Value::Bool(l.in_service),
            f64_value(l.max_loading_percent),
        ]
    })?;

    let trafo = make_dataframe(TRAFO_SCHEMA, &model.trafo, |t| {
        vec![
            str_value(&t.name),
            str_value(&t.std_type),
            index_value(t.hv_bus),
            index_value(t.lv_bus),
            f64_value(t.sn_mva),
            f64_value(t.vn_hv_kv),
            f64_value(t.vn_lv_kv),
            f64_value(t.vk_percent),
            f64_value(t.vkr_percent),
            f64_value(t.pfe_kw),
            f64_value(t.i0_percent),
            f64_value(t.shift_degree),
            str_value(&t.tap_side),
            f64_value(t.tap_neutral),
            f64_value(t.tap_min),
            f64_value(t.tap_max),
            f64_value(t.tap_step_percent),
            f64_value(t.tap_step_degree),
            f64_value(t.tap_pos),
            Value::Bool(t.tap_phase_shifter),
            Value::from(t.parallel),
            f64_value(t.df),
            Value::Bool(t.in_service),
            f64_value(t.max_loading_percent),
        ]
    })?;

    let shunt = make_dataframe(SHUNT_SCHEMA, &model.shunt, |s| {
        vec![
            s.bus.map(index_value).unwrap_or(Value::Null),
            str_value(&s.name),
            f64_value(s.q_mvar),
            f64_value(s.p_mw),
            f64_value(s.vn_kv),
            f64_value(s.step),
            Value::from(s.max_step),
            Value::Bool(s.in_service),
        ]
    })?;

    let payload = json!({
        "_module": "pandapower.auxiliary",
        "_class": "pandapowerNet",
        "_object": {
            "bus": bus,
            "load": load,
            "gen": gen,
            "ext_grid": ext_grid,
            "line": line,
            "trafo": trafo,
            "shunt": shunt,
            "name": model.name,
            "f_hz": f64_value(model.f_hz),
            "sn_mva": f64_value(model.sn_mva),
        }
    });

    let output = serde_json::to_string_pretty(&payload)?;
    fs::write(path, output)
        .with_context(|| format!("writing pandapower JSON file '{}'", path.display()))?;
    Ok(())
}
