//! Element rows of the grid model tables.
//!
//! Field names follow the pandapower column names so the JSON codec and the
//! side-car files can use them verbatim. Defaults are the values pandapower
//! fills in when an element is created without the optional parameters.

/// Behaviour shared by every table row.
pub trait Element: Clone {
    fn name(&self) -> Option<&str>;
    fn set_name(&mut self, name: Option<String>);
    fn in_service(&self) -> bool;
    fn set_in_service(&mut self, in_service: bool);
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                fn name(&self) -> Option<&str> {
                    self.name.as_deref()
                }
                fn set_name(&mut self, name: Option<String>) {
                    self.name = name;
                }
                fn in_service(&self) -> bool {
                    self.in_service
                }
                fn set_in_service(&mut self, in_service: bool) {
                    self.in_service = in_service;
                }
            }
        )*
    };
}

impl_element!(Bus, Load, Gen, ExtGrid, Line, Trafo, Shunt);

#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub name: Option<String>,
    /// Nominal voltage (kV)
    pub vn_kv: f64,
    pub kind: String,
    pub zone: Option<f64>,
    pub in_service: bool,
    pub max_vm_pu: f64,
    pub min_vm_pu: f64,
}

impl Default for Bus {
    fn default() -> Self {
        Self {
            name: None,
            vn_kv: 0.0,
            kind: "b".to_string(),
            zone: None,
            in_service: true,
            max_vm_pu: f64::NAN,
            min_vm_pu: f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    pub name: Option<String>,
    /// Index label of the connected bus
    pub bus: usize,
    pub p_mw: f64,
    pub q_mvar: f64,
    pub const_z_percent: f64,
    pub const_i_percent: f64,
    pub sn_mva: f64,
    pub scaling: f64,
    pub in_service: bool,
    pub kind: Option<String>,
}

impl Default for Load {
    fn default() -> Self {
        Self {
            name: None,
            bus: 0,
            p_mw: 0.0,
            q_mvar: 0.0,
            const_z_percent: 0.0,
            const_i_percent: 0.0,
            sn_mva: f64::NAN,
            scaling: 1.0,
            in_service: true,
            kind: Some("wye".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gen {
    pub name: Option<String>,
    pub bus: usize,
    pub p_mw: f64,
    /// Voltage setpoint (p.u.)
    pub vm_pu: f64,
    pub sn_mva: f64,
    pub min_q_mvar: f64,
    pub max_q_mvar: f64,
    pub scaling: f64,
    pub slack: bool,
    pub in_service: bool,
    pub kind: Option<String>,
    pub controllable: bool,
    pub max_p_mw: f64,
    pub min_p_mw: f64,
}

impl Default for Gen {
    fn default() -> Self {
        Self {
            name: None,
            bus: 0,
            p_mw: 0.0,
            vm_pu: 1.0,
            sn_mva: f64::NAN,
            min_q_mvar: f64::NAN,
            max_q_mvar: f64::NAN,
            scaling: 1.0,
            slack: false,
            in_service: true,
            kind: None,
            controllable: true,
            max_p_mw: f64::NAN,
            min_p_mw: f64::NAN,
        }
    }
}

/// External grid connection; the slack machines of a legacy case.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtGrid {
    pub name: Option<String>,
    pub bus: usize,
    pub vm_pu: f64,
    pub va_degree: f64,
    pub in_service: bool,
    pub max_p_mw: f64,
    pub min_p_mw: f64,
    pub max_q_mvar: f64,
    pub min_q_mvar: f64,
}

impl Default for ExtGrid {
    fn default() -> Self {
        Self {
            name: None,
            bus: 0,
            vm_pu: 1.0,
            va_degree: 0.0,
            in_service: true,
            max_p_mw: f64::NAN,
            min_p_mw: f64::NAN,
            max_q_mvar: f64::NAN,
            min_q_mvar: f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub name: Option<String>,
    pub std_type: Option<String>,
    pub from_bus: usize,
    pub to_bus: usize,
    pub length_km: f64,
    pub r_ohm_per_km: f64,
    pub x_ohm_per_km: f64,
    pub c_nf_per_km: f64,
    pub g_us_per_km: f64,
    pub max_i_ka: f64,
    pub df: f64,
    pub parallel: u32,
    pub kind: Option<String>,
    pub in_service: bool,
    pub max_loading_percent: f64,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            name: None,
            std_type: None,
            from_bus: 0,
            to_bus: 0,
            length_km: 1.0,
            r_ohm_per_km: 0.0,
            x_ohm_per_km: 0.0,
            c_nf_per_km: 0.0,
            g_us_per_km: 0.0,
            max_i_ka: 0.0,
            df: 1.0,
            parallel: 1,
            kind: Some("ol".to_string()),
            in_service: true,
            max_loading_percent: 100.0,
        }
    }
}

/// Two-winding transformer. `hv_bus` is always the legacy from-end.
#[derive(Debug, Clone, PartialEq)]
pub struct Trafo {
    pub name: Option<String>,
    pub std_type: Option<String>,
    pub hv_bus: usize,
    pub lv_bus: usize,
    pub sn_mva: f64,
    pub vn_hv_kv: f64,
    pub vn_lv_kv: f64,
    pub vk_percent: f64,
    pub vkr_percent: f64,
    pub pfe_kw: f64,
    pub i0_percent: f64,
    pub shift_degree: f64,
    pub tap_side: Option<String>,
    pub tap_neutral: f64,
    pub tap_min: f64,
    pub tap_max: f64,
    pub tap_step_percent: f64,
    pub tap_step_degree: f64,
    pub tap_pos: f64,
    pub tap_phase_shifter: bool,
    pub parallel: u32,
    pub df: f64,
    pub in_service: bool,
    pub max_loading_percent: f64,
}

impl Default for Trafo {
    fn default() -> Self {
        Self {
            name: None,
            std_type: None,
            hv_bus: 0,
            lv_bus: 0,
            sn_mva: 0.0,
            vn_hv_kv: 0.0,
            vn_lv_kv: 0.0,
            vk_percent: 0.0,
            vkr_percent: 0.0,
            pfe_kw: 0.0,
            i0_percent: 0.0,
            shift_degree: 0.0,
            tap_side: None,
            tap_neutral: f64::NAN,
            tap_min: f64::NAN,
            tap_max: f64::NAN,
            tap_step_percent: f64::NAN,
            tap_step_degree: f64::NAN,
            tap_pos: f64::NAN,
            tap_phase_shifter: false,
            parallel: 1,
            df: 1.0,
            in_service: true,
            max_loading_percent: 100.0,
        }
    }
}

impl Trafo {
    /// Off-nominal ratio contributed by the tap changer (1.0 without a tap).
    pub fn tap_ratio(&self) -> f64 {
        if self.tap_pos.is_nan() || self.tap_step_percent.is_nan() {
            return 1.0;
        }
        let neutral = if self.tap_neutral.is_nan() {
            0.0
        } else {
            self.tap_neutral
        };
        let ratio = 1.0 + (self.tap_pos - neutral) * self.tap_step_percent / 100.0;
        match self.tap_side.as_deref() {
            Some("lv") => 1.0 / ratio,
            _ => ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shunt {
    pub name: Option<String>,
    /// `None` when the shunts side-car row names no bus of the model
    pub bus: Option<usize>,
    /// Reactive power per step (MVAr, load convention)
    pub q_mvar: f64,
    /// Active power per step (MW)
    pub p_mw: f64,
    pub vn_kv: f64,
    pub step: f64,
    pub max_step: u32,
    pub in_service: bool,
}

impl Default for Shunt {
    fn default() -> Self {
        Self {
            name: None,
            bus: Some(0),
            q_mvar: 0.0,
            p_mw: 0.0,
            vn_kv: 0.0,
            step: 1.0,
            max_step: 1,
            in_service: true,
        }
    }
}
