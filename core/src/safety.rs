//! Safety figures for recreational dive planning.
//!
//! Pure functions converting depth, gas and duration into MOD, EAD, NDL,
//! surface interval and best-mix recommendations. Nothing here holds state
//! or validates input: non-positive depths fall into the shallowest NDL
//! bracket, and callers reject them before asking.

use serde::{Deserialize, Serialize};

use crate::gas::{resolve_o2_percentage, GasMix, AIR_O2_PERCENTAGE};

// ============================================================================
// Constants
// ============================================================================

/// Maximum tolerated oxygen partial pressure (bar).
pub const MAX_PPO2: f64 = 1.4;

/// Nitrogen fraction of air.
pub const AIR_FN2: f64 = 0.79;

/// Metres of seawater per bar of pressure.
const METERS_PER_BAR: f64 = 10.0;

/// NDL table: inclusive upper depth bound (m) and no-deco minutes on air.
const NDL_TABLE: [(f64, u32); 10] = [
    (12.0, 200),
    (15.0, 100),
    (18.0, 60),
    (21.0, 50),
    (24.0, 40),
    (27.0, 30),
    (30.0, 25),
    (33.0, 20),
    (36.0, 15),
    (39.0, 10),
];

/// NDL below the deepest table bracket.
const NDL_BEYOND_TABLE: u32 = 5;

const NITROX32_NDL_FACTOR: f64 = 1.2;
const NITROX36_NDL_FACTOR: f64 = 1.4;
/// NDL bonus per percent of oxygen above air for custom mixes.
const CUSTOM_NDL_FACTOR_PER_PERCENT: f64 = 0.01;

/// Best-mix thresholds on the maximum usable oxygen percentage.
const BEST_MIX_NITROX32_MIN: f64 = 32.0;
const BEST_MIX_APPROX_MIN: f64 = 28.0;
const BEST_MIX_APPROX_PERCENTAGE: u32 = 28;

pub const SAFETY_STOP_DEPTH_M: f64 = 5.0;
pub const SAFETY_STOP_MIN: f64 = 3.0;

// ============================================================================
// Depth classes
// ============================================================================

/// Depth bands used for surface interval guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthClass {
    /// Down to 18m
    Shallow,
    /// 18-30m
    Intermediate,
    /// Beyond 30m
    Deep,
}

impl DepthClass {
    pub fn from_depth_m(depth: f64) -> Self {
        if depth <= 18.0 {
            DepthClass::Shallow
        } else if depth <= 30.0 {
            DepthClass::Intermediate
        } else {
            DepthClass::Deep
        }
    }

    /// Recommended surface interval in hours, as a display label.
    pub fn surface_interval_hours(&self) -> &'static str {
        match self {
            DepthClass::Shallow => "2",
            DepthClass::Intermediate => "3",
            DepthClass::Deep => "4",
        }
    }
}

// ============================================================================
// Calculations
// ============================================================================

/// Maximum operating depth (m) for a given oxygen percentage.
pub fn calculate_mod(o2_percentage: f64) -> f64 {
    ((MAX_PPO2 / (o2_percentage / 100.0)) - 1.0) * METERS_PER_BAR
}

/// Equivalent air depth (m) of a mix at the given depth.
pub fn calculate_ead(o2_percentage: f64, depth: f64) -> f64 {
    ((1.0 - o2_percentage / 100.0) / AIR_FN2) * (depth + METERS_PER_BAR) - METERS_PER_BAR
}

/// No-decompression limit in whole minutes.
pub fn calculate_ndl(depth: f64, gas_mix: GasMix) -> u32 {
    let base = NDL_TABLE
        .iter()
        .find(|(max_depth, _)| depth <= *max_depth)
        .map(|(_, minutes)| *minutes)
        .unwrap_or(NDL_BEYOND_TABLE);

    (f64::from(base) * ndl_multiplier(gas_mix)).round() as u32
}

fn ndl_multiplier(gas_mix: GasMix) -> f64 {
    match gas_mix {
        GasMix::Air => 1.0,
        GasMix::Nitrox32 => NITROX32_NDL_FACTOR,
        GasMix::Nitrox36 => NITROX36_NDL_FACTOR,
        GasMix::Custom(_) => {
            let o2 = resolve_o2_percentage(gas_mix);
            1.0 + (o2 - AIR_O2_PERCENTAGE) * CUSTOM_NDL_FACTOR_PER_PERCENT
        }
    }
}

/// Recommended surface interval in hours, as a label.
pub fn calculate_surface_interval(depth: f64) -> &'static str {
    DepthClass::from_depth_m(depth).surface_interval_hours()
}

/// Highest oxygen percentage that stays within `MAX_PPO2` at `target_depth`.
pub fn max_o2_for_depth(target_depth: f64) -> f64 {
    MAX_PPO2 / (target_depth / METERS_PER_BAR + 1.0) * 100.0
}

/// Gas recommendation for a target depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BestMix {
    Nitrox32,
    /// Between the standard mixes; rounded down to the nearest usual blend.
    Approximate { o2_percentage: u32 },
    Custom { o2_percentage: u32 },
    /// Even air exceeds the oxygen limit: trimix territory.
    NoSafeMix { max_o2: f64 },
}

impl BestMix {
    pub fn label(&self) -> String {
        match self {
            BestMix::Nitrox32 => "Nitrox 32".to_string(),
            BestMix::Approximate { o2_percentage } => format!("Nitrox {o2_percentage}% (approx.)"),
            BestMix::Custom { o2_percentage } => format!("Nitrox {o2_percentage}%"),
            BestMix::NoSafeMix { max_o2 } => format!(
                "No safe mix within recreational limits (max O₂ {max_o2:.1}%): trimix required"
            ),
        }
    }
}

/// Richest usable mix for a target depth.
pub fn calculate_best_mix(target_depth: f64) -> BestMix {
    let max_o2 = max_o2_for_depth(target_depth);
    if max_o2 < AIR_O2_PERCENTAGE {
        BestMix::NoSafeMix { max_o2 }
    } else if max_o2 >= BEST_MIX_NITROX32_MIN {
        BestMix::Nitrox32
    } else if max_o2 >= BEST_MIX_APPROX_MIN {
        BestMix::Approximate {
            o2_percentage: BEST_MIX_APPROX_PERCENTAGE,
        }
    } else {
        BestMix::Custom {
            o2_percentage: max_o2.floor() as u32,
        }
    }
}

/// Safety-stop guidance shown with every plan.
pub fn safety_stop_guidance() -> String {
    format!("{SAFETY_STOP_MIN} min at {SAFETY_STOP_DEPTH_M}m")
}

// ============================================================================
// Snapshot
// ============================================================================

/// Safety figures captured when a plan is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySnapshot {
    pub o2_percentage: f64,
    pub ndl_min: u32,
    pub mod_m: f64,
    pub ead_m: f64,
    pub surface_interval_hours: String,
    pub safety_stop: String,
}

impl SafetySnapshot {
    pub fn compute(depth: f64, gas_mix: GasMix) -> Self {
        let o2_percentage = resolve_o2_percentage(gas_mix);
        SafetySnapshot {
            o2_percentage,
            ndl_min: calculate_ndl(depth, gas_mix),
            mod_m: calculate_mod(o2_percentage),
            ead_m: calculate_ead(o2_percentage, depth),
            surface_interval_hours: calculate_surface_interval(depth).to_string(),
            safety_stop: safety_stop_guidance(),
        }
    }
}
