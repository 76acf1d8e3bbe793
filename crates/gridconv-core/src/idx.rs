//! Fixed column positions of the MATPOWER `bus`, `gen` and `branch` blocks.
//!
//! These positions are an external contract shared with every MATPOWER
//! reader; they must never be reordered.

// Bus //

// define bus types
pub const PQ: f64 = 1.0;
pub const PV: f64 = 2.0;
pub const REF: f64 = 3.0;
pub const NONE: f64 = 4.0;

// define the indices
pub const BUS_I: usize = 0; // bus number (1 to 29997)
pub const BUS_TYPE: usize = 1; // bus type
pub const PD: usize = 2; // Pd, real power demand (MW)
pub const QD: usize = 3; // Qd, reactive power demand (MVAr)
pub const GS: usize = 4; // Gs, shunt conductance (MW at V = 1.0 p.u.)
pub const BS: usize = 5; // Bs, shunt susceptance (MVAr at V = 1.0 p.u.)
pub const BUS_AREA: usize = 6; // area number, 1-100
pub const VM: usize = 7; // Vm, voltage magnitude (p.u.)
pub const VA: usize = 8; // Va, voltage angle (degrees)
pub const BASE_KV: usize = 9; // baseKV, base voltage (kV)
pub const ZONE: usize = 10; // zone, loss zone (1-999)
pub const VMAX: usize = 11; // maxVm, maximum voltage magnitude (p.u.)
pub const VMIN: usize = 12; // minVm, minimum voltage magnitude (p.u.)

/// Columns of a MATPOWER bus row (without OPF results).
pub const BUS_COLS: usize = 13;

// Gen //

pub const GEN_BUS: usize = 0; // bus number
pub const PG: usize = 1; // Pg, real power output (MW)
pub const QG: usize = 2; // Qg, reactive power output (MVAr)
pub const QMAX: usize = 3; // Qmax, maximum reactive power output at Pmin (MVAr)
pub const QMIN: usize = 4; // Qmin, minimum reactive power output at Pmin (MVAr)
pub const VG: usize = 5; // Vg, voltage magnitude setpoint (p.u.)
pub const MBASE: usize = 6; // mBase, total MVA base of this machine, defaults to baseMVA
pub const GEN_STATUS: usize = 7; // status, 1 - machine in service, 0 - machine out of service
pub const PMAX: usize = 8; // Pmax, maximum real power output (MW)
pub const PMIN: usize = 9; // Pmin, minimum real power output (MW)
pub const PC1: usize = 10; // Pc1, lower real power output of PQ capability curve (MW)
pub const PC2: usize = 11; // Pc2, upper real power output of PQ capability curve (MW)
pub const QC1MIN: usize = 12; // Qc1min, minimum reactive power output at Pc1 (MVAr)
pub const QC1MAX: usize = 13; // Qc1max, maximum reactive power output at Pc1 (MVAr)
pub const QC2MIN: usize = 14; // Qc2min, minimum reactive power output at Pc2 (MVAr)
pub const QC2MAX: usize = 15; // Qc2max, maximum reactive power output at Pc2 (MVAr)
pub const RAMP_AGC: usize = 16; // ramp rate for load following/AGC (MW/min)
pub const RAMP_10: usize = 17; // ramp rate for 10 minute reserves (MW)
pub const RAMP_30: usize = 18; // ramp rate for 30 minute reserves (MW)
pub const RAMP_Q: usize = 19; // ramp rate for reactive power (2 sec timescale) (MVAr/min)
pub const APF: usize = 20; // area participation factor

/// Columns of a MATPOWER gen row (without OPF results).
pub const GEN_COLS: usize = 21;

// Branch //

pub const F_BUS: usize = 0; // f, from bus number
pub const T_BUS: usize = 1; // t, to bus number
pub const BR_R: usize = 2; // r, resistance (p.u.)
pub const BR_X: usize = 3; // x, reactance (p.u.)
pub const BR_B: usize = 4; // b, total line charging susceptance (p.u.)
pub const RATE_A: usize = 5; // rateA, MVA rating A (long term rating)
pub const RATE_B: usize = 6; // rateB, MVA rating B (short term rating)
pub const RATE_C: usize = 7; // rateC, MVA rating C (emergency rating)
pub const TAP: usize = 8; // ratio, transformer off nominal turns ratio
pub const SHIFT: usize = 9; // angle, transformer phase shift angle (degrees)
pub const BR_STATUS: usize = 10; // initial branch status, 1 - in service, 0 - out of service
pub const ANGMIN: usize = 11; // minimum angle difference, angle(Vf) - angle(Vt) (degrees)
pub const ANGMAX: usize = 12; // maximum angle difference, angle(Vf) - angle(Vt) (degrees)

/// Columns of a MATPOWER branch row (without power flow results).
pub const BRANCH_COLS: usize = 13;

/// Minimum number of values a parsed row must carry to be usable.
pub const BUS_MIN_COLS: usize = 13;
pub const GEN_MIN_COLS: usize = 10;
pub const BRANCH_MIN_COLS: usize = 11;
