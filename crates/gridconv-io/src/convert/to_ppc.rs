use std::collections::HashMap;
use std::f64::consts::PI;

use gridconv_core::idx::*;
use gridconv_core::{
    Bus, CaseArray, Element, GridError, GridModel, GridResult, LegacyCase, Line, Trafo,
};
use tracing::debug;

/// Default voltage limits written for buses without limits (p.u.).
const DEFAULT_VMAX: f64 = 2.0;
const DEFAULT_VMIN: f64 = 0.0;

/// Build a legacy case from a [`GridModel`].
///
/// Every bus is written, numbered `1..=n` in table order. Loads and shunts
/// fold into the bus demand and shunt columns. Only in-service external
/// grids, generators, lines and transformers are written: external grids
/// first, then generators; lines first, then transformers.
pub fn to_ppc(model: &GridModel) -> GridResult<LegacyCase> {
    let base_mva = model.sn_mva;
    if base_mva.is_nan() || base_mva <= 0.0 {
        return Err(GridError::Conversion(format!(
            "sn_mva must be positive, got {}",
            base_mva
        )));
    }

    let positions: HashMap<usize, usize> = model
        .bus
        .index()
        .iter()
        .enumerate()
        .map(|(pos, &label)| (label, pos))
        .collect();
    let bus_pos = |label: usize, what: &str| -> GridResult<usize> {
        positions.get(&label).copied().ok_or_else(|| {
            GridError::Conversion(format!("{} references unknown bus {}", what, label))
        })
    };

    let mut rows: Vec<Vec<f64>> = model
        .bus
        .rows()
        .iter()
        .enumerate()
        .map(|(pos, bus)| bus_row(pos, bus))
        .collect();

    for load in model.load.rows().iter().filter(|l| l.in_service()) {
        let row = &mut rows[bus_pos(load.bus, "load")?];
        row[PD] += load.p_mw * load.scaling;
        row[QD] += load.q_mvar * load.scaling;
    }

    for shunt in model.shunt.rows().iter().filter(|s| s.in_service()) {
        let label = shunt.bus.ok_or_else(|| {
            GridError::Conversion("in-service shunt has no bus".to_string())
        })?;
        let pos = bus_pos(label, "shunt")?;
        let bus_kv = model.bus.rows()[pos].vn_kv;
        let v_ratio = if shunt.vn_kv > 0.0 {
            (bus_kv / shunt.vn_kv).powi(2)
        } else {
            1.0
        };
        let row = &mut rows[pos];
        row[GS] += shunt.p_mw * shunt.step * v_ratio;
        row[BS] -= shunt.q_mvar * shunt.step * v_ratio;
    }

    let mut gen = CaseArray::new();
    for ext_grid in model.ext_grid.rows().iter().filter(|e| e.in_service()) {
        let pos = bus_pos(ext_grid.bus, "ext_grid")?;
        let mut row = vec![0.0; GEN_COLS];
        row[GEN_BUS] = (pos + 1) as f64;
        row[QMAX] = upper_limit(ext_grid.max_q_mvar);
        row[QMIN] = lower_limit(ext_grid.min_q_mvar);
        row[VG] = ext_grid.vm_pu;
        row[MBASE] = base_mva;
        row[GEN_STATUS] = 1.0;
        row[PMAX] = upper_limit(ext_grid.max_p_mw);
        row[PMIN] = lower_limit(ext_grid.min_p_mw);
        gen.push_row(row);

        let bus = &mut rows[pos];
        if bus[BUS_TYPE] != NONE {
            bus[BUS_TYPE] = REF;
        }
        bus[VM] = ext_grid.vm_pu;
        bus[VA] = ext_grid.va_degree;
    }
    for g in model.gen.rows().iter().filter(|g| g.in_service()) {
        let pos = bus_pos(g.bus, "gen")?;
        let mut row = vec![0.0; GEN_COLS];
        row[GEN_BUS] = (pos + 1) as f64;
        row[PG] = g.p_mw * g.scaling;
        row[QMAX] = upper_limit(g.max_q_mvar);
        row[QMIN] = lower_limit(g.min_q_mvar);
        row[VG] = g.vm_pu;
        row[MBASE] = if g.sn_mva.is_finite() && g.sn_mva > 0.0 {
            g.sn_mva
        } else {
            base_mva
        };
        row[GEN_STATUS] = 1.0;
        row[PMAX] = upper_limit(g.max_p_mw);
        row[PMIN] = lower_limit(g.min_p_mw);
        gen.push_row(row);

        let bus = &mut rows[pos];
        if bus[BUS_TYPE] == PQ {
            bus[BUS_TYPE] = PV;
            bus[VM] = g.vm_pu;
        }
    }

    let mut branch = CaseArray::new();
    for line in model.line.rows().iter().filter(|l| l.in_service()) {
        let from = bus_pos(line.from_bus, "line")?;
        let to = bus_pos(line.to_bus, "line")?;
        let vn_kv = model.bus.rows()[from].vn_kv;
        branch.push_row(line_row(line, from, to, vn_kv, base_mva, model.f_hz));
    }
    for trafo in model.trafo.rows().iter().filter(|t| t.in_service()) {
        let hv = bus_pos(trafo.hv_bus, "trafo")?;
        let lv = bus_pos(trafo.lv_bus, "trafo")?;
        let hv_kv = model.bus.rows()[hv].vn_kv;
        let lv_kv = model.bus.rows()[lv].vn_kv;
        branch.push_row(trafo_row(trafo, hv, lv, hv_kv, lv_kv, base_mva));
    }

    let case = LegacyCase {
        version: "2".to_string(),
        base_mva,
        bus: CaseArray::from_rows(rows),
        gen,
        branch,
    };
    debug!(
        buses = case.bus.len(),
        gens = case.gen.len(),
        branches = case.branch.len(),
        "converted grid model to legacy case"
    );
    Ok(case)
}

fn bus_row(pos: usize, bus: &Bus) -> Vec<f64> {
    let mut row = vec![0.0; BUS_COLS];
    row[BUS_I] = (pos + 1) as f64;
    row[BUS_TYPE] = if bus.in_service { PQ } else { NONE };
    row[BUS_AREA] = 1.0;
    row[VM] = 1.0;
    row[BASE_KV] = bus.vn_kv;
    row[ZONE] = bus.zone.filter(|z| z.is_finite()).unwrap_or(1.0);
    row[VMAX] = if bus.max_vm_pu.is_nan() {
        DEFAULT_VMAX
    } else {
        bus.max_vm_pu
    };
    row[VMIN] = if bus.min_vm_pu.is_nan() {
        DEFAULT_VMIN
    } else {
        bus.min_vm_pu
    };
    row
}

fn line_row(
    line: &Line,
    from: usize,
    to: usize,
    vn_kv: f64,
    base_mva: f64,
    f_hz: f64,
) -> Vec<f64> {
    let parallel = f64::from(line.parallel.max(1));
    let z_base = vn_kv * vn_kv / base_mva;
    let (r, x, b) = if z_base > 0.0 {
        (
            line.r_ohm_per_km * line.length_km / parallel / z_base,
            line.x_ohm_per_km * line.length_km / parallel / z_base,
            2.0 * PI * f_hz * line.c_nf_per_km * 1e-9 * line.length_km * parallel * z_base,
        )
    } else {
        (0.0, 0.0, 0.0)
    };
    let rate = line.max_i_ka * line.df * parallel * 3f64.sqrt() * vn_kv;

    let mut row = vec![0.0; BRANCH_COLS];
    row[F_BUS] = (from + 1) as f64;
    row[T_BUS] = (to + 1) as f64;
    row[BR_R] = r;
    row[BR_X] = x;
    row[BR_B] = b;
    row[RATE_A] = rate;
    row[RATE_B] = rate;
    row[RATE_C] = rate;
    row[BR_STATUS] = 1.0;
    row[ANGMIN] = -360.0;
    row[ANGMAX] = 360.0;
    row
}

fn trafo_row(
    trafo: &Trafo,
    hv: usize,
    lv: usize,
    hv_kv: f64,
    lv_kv: f64,
    base_mva: f64,
) -> Vec<f64> {
    let parallel = f64::from(trafo.parallel.max(1));
    let to_rating = trafo.sn_mva / base_mva;
    // rated voltages differing from the bus voltages scale the impedance
    let lv_factor = if lv_kv > 0.0 {
        (trafo.vn_lv_kv / lv_kv).powi(2)
    } else {
        1.0
    };
    let (r, x, b) = if to_rating > 0.0 {
        let z = trafo.vk_percent / 100.0 / to_rating * lv_factor;
        let r = trafo.vkr_percent / 100.0 / to_rating * lv_factor;
        let x = (z * z - r * r).max(0.0).sqrt();
        let b = -trafo.i0_percent / 100.0 * to_rating / lv_factor;
        (r / parallel, x / parallel, b * parallel)
    } else {
        (0.0, 0.0, 0.0)
    };

    let nominal = if hv_kv > 0.0 && lv_kv > 0.0 && trafo.vn_lv_kv > 0.0 {
        (trafo.vn_hv_kv / trafo.vn_lv_kv) / (hv_kv / lv_kv)
    } else {
        1.0
    };
    let rate = trafo.sn_mva * trafo.df * parallel;

    let mut row = vec![0.0; BRANCH_COLS];
    row[F_BUS] = (hv + 1) as f64;
    row[T_BUS] = (lv + 1) as f64;
    row[BR_R] = r;
    row[BR_X] = x;
    row[BR_B] = b;
    row[RATE_A] = rate;
    row[RATE_B] = rate;
    row[RATE_C] = rate;
    row[TAP] = trafo.tap_ratio() * nominal;
    row[SHIFT] = trafo.shift_degree;
    row[BR_STATUS] = 1.0;
    row[ANGMIN] = -360.0;
    row[ANGMAX] = 360.0;
    row
}

fn upper_limit(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

fn lower_limit(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value
    }
}
