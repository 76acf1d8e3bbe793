use std::collections::HashMap;
use std::f64::consts::PI;

use gridconv_core::idx::*;
use gridconv_core::{
    Bus, CaseArray, ExtGrid, Gen, GridError, GridModel, GridResult, LegacyCase, Line, Load, Shunt,
    Trafo,
};
use tracing::debug;

use crate::helpers::safe_f64_to_usize;
use crate::layout::DEFAULT_F_HZ;

/// Build a [`GridModel`] from a legacy case.
///
/// Bus index labels are the 0-based bus row positions; the original bus
/// numbers are kept as bus names. Generators on reference buses become
/// external grids. Branches become transformers when they carry an
/// off-nominal ratio, a phase shift or connect buses of different base
/// voltage, and lines otherwise.
pub fn from_ppc(case: &LegacyCase) -> GridResult<GridModel> {
    check_width(&case.bus, "bus", BUS_MIN_COLS)?;
    check_width(&case.gen, "gen", GEN_MIN_COLS)?;
    check_width(&case.branch, "branch", BRANCH_MIN_COLS)?;
    if case.base_mva.is_nan() || case.base_mva <= 0.0 {
        return Err(GridError::Conversion(format!(
            "baseMVA must be positive, got {}",
            case.base_mva
        )));
    }

    let base_mva = case.base_mva;
    let mut model = GridModel {
        f_hz: DEFAULT_F_HZ,
        sn_mva: base_mva,
        ..GridModel::default()
    };

    let mut bus_lookup: HashMap<usize, usize> = HashMap::with_capacity(case.bus.len());
    for (pos, row) in case.bus.rows().iter().enumerate() {
        let number = safe_f64_to_usize(row[BUS_I])
            .map_err(|err| GridError::Conversion(format!("bus row {}: {}", pos, err)))?;
        if bus_lookup.insert(number, pos).is_some() {
            return Err(GridError::Conversion(format!(
                "duplicate bus number {}",
                number
            )));
        }

        let vn_kv = row[BASE_KV];
        model.bus.push(
            pos,
            Bus {
                name: Some(number.to_string()),
                vn_kv,
                zone: Some(row[ZONE]),
                in_service: row[BUS_TYPE] != NONE,
                max_vm_pu: row[VMAX],
                min_vm_pu: row[VMIN],
                ..Bus::default()
            },
        );

        if row[PD] != 0.0 || row[QD] != 0.0 {
            model.load.append(Load {
                bus: pos,
                p_mw: row[PD],
                q_mvar: row[QD],
                ..Load::default()
            });
        }
        if row[GS] != 0.0 || row[BS] != 0.0 {
            model.shunt.append(Shunt {
                bus: Some(pos),
                p_mw: row[GS],
                q_mvar: -row[BS],
                vn_kv,
                ..Shunt::default()
            });
        }
    }

    let resolve = |value: f64, what: &str, row: usize| -> GridResult<usize> {
        safe_f64_to_usize(value)
            .ok()
            .and_then(|number| bus_lookup.get(&number).copied())
            .ok_or_else(|| {
                GridError::Conversion(format!(
                    "{} row {} references unknown bus {}",
                    what, row, value
                ))
            })
    };

    for (row_idx, row) in case.gen.rows().iter().enumerate() {
        let bus = resolve(row[GEN_BUS], "gen", row_idx)?;
        let bus_row = &case.bus.rows()[bus];
        let in_service = row[GEN_STATUS] > 0.0;

        if bus_row[BUS_TYPE] == REF {
            model.ext_grid.append(ExtGrid {
                bus,
                vm_pu: row[VG],
                va_degree: bus_row[VA],
                in_service,
                max_p_mw: row[PMAX],
                min_p_mw: row[PMIN],
                max_q_mvar: row[QMAX],
                min_q_mvar: row[QMIN],
                ..ExtGrid::default()
            });
        } else {
            model.gen.append(Gen {
                bus,
                p_mw: row[PG],
                vm_pu: row[VG],
                sn_mva: row[MBASE],
                min_q_mvar: row[QMIN],
                max_q_mvar: row[QMAX],
                in_service,
                max_p_mw: row[PMAX],
                min_p_mw: row[PMIN],
                ..Gen::default()
            });
        }
    }

    for (row_idx, row) in case.branch.rows().iter().enumerate() {
        let from = resolve(row[F_BUS], "branch", row_idx)?;
        let to = resolve(row[T_BUS], "branch", row_idx)?;
        let from_kv = case.bus.rows()[from][BASE_KV];
        let to_kv = case.bus.rows()[to][BASE_KV];
        let in_service = row[BR_STATUS] > 0.0;

        let ratio = row[TAP];
        let shift = row[SHIFT];
        let is_trafo = (ratio != 0.0 && ratio != 1.0) || shift != 0.0 || from_kv != to_kv;

        if is_trafo {
            model.trafo.append(trafo_from_branch(
                row, from, to, from_kv, to_kv, base_mva, in_service,
            ));
        } else {
            model.line.append(line_from_branch(
                row,
                from,
                to,
                from_kv,
                base_mva,
                model.f_hz,
                in_service,
            ));
        }
    }

    debug!(
        buses = model.bus.len(),
        loads = model.load.len(),
        gens = model.gen.len(),
        ext_grids = model.ext_grid.len(),
        lines = model.line.len(),
        trafos = model.trafo.len(),
        shunts = model.shunt.len(),
        "converted legacy case to grid model"
    );
    Ok(model)
}

fn check_width(array: &CaseArray, name: &str, min_cols: usize) -> GridResult<()> {
    match array.rows().iter().position(|row| row.len() < min_cols) {
        Some(pos) => Err(GridError::Conversion(format!(
            "{} row {} has fewer than {} columns",
            name, pos, min_cols
        ))),
        None => Ok(()),
    }
}

fn line_from_branch(
    row: &[f64],
    from: usize,
    to: usize,
    vn_kv: f64,
    base_mva: f64,
    f_hz: f64,
    in_service: bool,
) -> Line {
    let z_base = vn_kv * vn_kv / base_mva;
    let max_i_ka = if vn_kv > 0.0 {
        row[RATE_A] / (3f64.sqrt() * vn_kv)
    } else {
        0.0
    };
    Line {
        from_bus: from,
        to_bus: to,
        length_km: 1.0,
        r_ohm_per_km: row[BR_R] * z_base,
        x_ohm_per_km: row[BR_X] * z_base,
        c_nf_per_km: if z_base > 0.0 {
            row[BR_B] / (2.0 * PI * f_hz * z_base) * 1e9
        } else {
            0.0
        },
        max_i_ka,
        in_service,
        ..Line::default()
    }
}

fn trafo_from_branch(
    row: &[f64],
    hv: usize,
    lv: usize,
    hv_kv: f64,
    lv_kv: f64,
    base_mva: f64,
    in_service: bool,
) -> Trafo {
    let sn_mva = if row[RATE_A] > 0.0 {
        row[RATE_A]
    } else {
        base_mva
    };
    // per unit on the system base -> percent on the transformer rating
    let to_rating = sn_mva / base_mva;
    let r = row[BR_R] * to_rating;
    let x = row[BR_X] * to_rating;

    let ratio = if row[TAP] == 0.0 { 1.0 } else { row[TAP] };
    let mut trafo = Trafo {
        hv_bus: hv,
        lv_bus: lv,
        sn_mva,
        vn_hv_kv: hv_kv,
        vn_lv_kv: lv_kv,
        vk_percent: (r * r + x * x).sqrt() * 100.0,
        vkr_percent: r * 100.0,
        i0_percent: -row[BR_B] * 100.0 / to_rating,
        shift_degree: row[SHIFT],
        in_service,
        ..Trafo::default()
    };
    if ratio != 1.0 {
        trafo.tap_side = Some("hv".to_string());
        trafo.tap_neutral = 0.0;
        trafo.tap_pos = 1.0;
        trafo.tap_step_percent = (ratio - 1.0) * 100.0;
    }
    trafo
}
