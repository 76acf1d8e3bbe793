//! Shunts side-car: one CSV row per shunt carrying the step calibration that
//! a MATPOWER bus row cannot hold.
//!
//! Written with the legacy header `bus,Bs,Gs,vn_kv,max_step,status`; read
//! with either that header or the model header
//! `bus,q_mvar,p_mw,vn_kv,max_step,in_service`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use gridconv_core::{GridModel, Shunt, Table};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::helpers::safe_f64_to_usize;
use crate::layout::SHUNT_DEFAULT_NAME;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuntRecord {
    /// 0-based bus position; empty when the shunt's bus is not in the bus table
    #[serde(serialize_with = "ser_opt_index", deserialize_with = "de_opt_index")]
    pub bus: Option<usize>,
    /// Legacy susceptance, `-q_mvar`
    #[serde(rename = "Bs", alias = "q_mvar")]
    pub bs: f64,
    #[serde(rename = "Gs", alias = "p_mw")]
    pub gs: f64,
    pub vn_kv: f64,
    #[serde(serialize_with = "ser_count", deserialize_with = "de_count")]
    pub max_step: u32,
    #[serde(
        rename = "status",
        alias = "in_service",
        serialize_with = "ser_flag",
        deserialize_with = "de_flag"
    )]
    pub status: bool,
}

/// Side-car rows for every shunt of `model`, with bus labels replaced by bus
/// positions and the reactive power sign flipped.
pub fn shunt_records(model: &GridModel) -> Vec<ShuntRecord> {
    let positions: HashMap<usize, usize> = model
        .bus
        .index()
        .iter()
        .enumerate()
        .map(|(pos, &label)| (label, pos))
        .collect();

    model
        .shunt
        .rows()
        .iter()
        .map(|shunt| ShuntRecord {
            bus: shunt.bus.and_then(|label| positions.get(&label).copied()),
            bs: -shunt.q_mvar,
            gs: shunt.p_mw,
            vn_kv: shunt.vn_kv,
            max_step: shunt.max_step,
            status: shunt.in_service,
        })
        .collect()
}

pub fn write_shunts(path: &Path, records: &[ShuntRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating shunts file: {}", path.display()))?;
    if records.is_empty() {
        writer.write_record(["bus", "Bs", "Gs", "vn_kv", "max_step", "status"])?;
    }
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("writing shunts file: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing shunts file: {}", path.display()))?;
    Ok(())
}

pub fn read_shunts(path: &Path) -> Result<Vec<ShuntRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening shunts file: {}", path.display()))?;
    reader
        .deserialize::<ShuntRecord>()
        .enumerate()
        .map(|(row, record)| {
            record.with_context(|| {
                format!("parsing shunts file {} row {}", path.display(), row + 1)
            })
        })
        .collect()
}

/// Replace the shunt table of `model` with the side-car rows.
///
/// `step` is the ratio between the reactive power the legacy conversion put
/// on the row's bus and the side-car value; rows whose bus had no shunt in
/// the conversion get `step = 0`. When several converted shunts share a bus
/// the first one is used. A zero side-car susceptance on such a bus also
/// gives `step = 0` instead of an infinite ratio.
///
/// Rows with an empty bus cell or a position outside the bus table are kept
/// with no bus and `step = 0`.
pub fn calibrate_shunts(model: &mut GridModel, records: Vec<ShuntRecord>) {
    let mut converted_q: HashMap<usize, f64> = HashMap::new();
    for shunt in model.shunt.rows() {
        if let Some(label) = shunt.bus {
            converted_q.entry(label).or_insert(shunt.q_mvar);
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        let label = record
            .bus
            .and_then(|bus| model.bus.index().get(bus).copied());
        if label.is_none() {
            warn!(
                row = row + 1,
                bus = ?record.bus,
                "shunt side-car row has no bus in the model; step set to 0"
            );
        }
        let q_mvar = -record.bs;

        let step = match label.and_then(|label| converted_q.get(&label)) {
            Some(_) if q_mvar == 0.0 => {
                warn!(
                    row = row + 1,
                    bus = ?record.bus,
                    "shunt side-car has zero susceptance; step set to 0"
                );
                0.0
            }
            Some(q_model) => q_model / q_mvar,
            None => 0.0,
        };

        rows.push(Shunt {
            name: Some(SHUNT_DEFAULT_NAME.to_string()),
            bus: label,
            q_mvar,
            p_mw: record.gs,
            vn_kv: record.vn_kv,
            step,
            max_step: record.max_step,
            in_service: record.status,
        });
    }

    debug!(shunts = rows.len(), "replaced shunt table from side-car");
    model.shunt = Table::from_rows(rows);
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn de_opt_index<'de, D: Deserializer<'de>>(de: D) -> Result<Option<usize>, D::Error> {
    let raw = String::deserialize(de)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_number(&raw)
        .and_then(|v| safe_f64_to_usize(v).ok())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid bus '{}'", raw)))
}

fn ser_opt_index<S: Serializer>(value: &Option<usize>, ser: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bus) => ser.serialize_u64(*bus as u64),
        None => ser.serialize_str(""),
    }
}

fn de_count<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    let raw = String::deserialize(de)?;
    parse_number(&raw)
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid step count '{}'", raw)))
}

fn ser_count<S: Serializer>(value: &u32, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_u32(*value)
}

fn de_flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(de)?;
    match raw.trim() {
        "True" | "true" | "TRUE" => Ok(true),
        "False" | "false" | "FALSE" => Ok(false),
        other => match parse_number(other) {
            Some(v) if v == 1.0 => Ok(true),
            Some(v) if v == 0.0 => Ok(false),
            _ => Err(serde::de::Error::custom(format!("invalid status '{}'", raw))),
        },
    }
}

fn ser_flag<S: Serializer>(value: &bool, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(if *value { "True" } else { "False" })
}
