//! Planned dive profile.
//!
//! Splits a planned square dive into descent, bottom, ascent and safety-stop
//! phases for charting. Inputs are plain numbers - no storage dependencies.

use serde::{Deserialize, Serialize};

use crate::gas::GasMix;
use crate::safety::{calculate_ndl, SAFETY_STOP_DEPTH_M, SAFETY_STOP_MIN};

/// Descent speed (m/min).
const DESCENT_RATE_M_MIN: f64 = 20.0;
/// Longest descent phase (min).
const MAX_DESCENT_MIN: f64 = 3.0;
/// Ascent speed (m/min).
const ASCENT_RATE_M_MIN: f64 = 10.0;
/// Longest ascent phase (min).
const MAX_ASCENT_MIN: f64 = 6.0;

/// Phases of a planned dive, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Descent,
    Bottom,
    Ascent,
    SafetyStop,
    Surface,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Start,
        Phase::Descent,
        Phase::Bottom,
        Phase::Ascent,
        Phase::SafetyStop,
        Phase::Surface,
    ];
}

/// A chartable point of the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub phase: Phase,
    /// Depth in meters
    pub depth_m: f64,
    /// Time spent in the phase, in minutes (None for instantaneous phases)
    pub duration_min: Option<f64>,
}

/// Computed profile for a planned dive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiveProfile {
    pub descent_min: f64,
    /// Duration minus descent and safety stop. Negative when the plan is too
    /// short to reach the bottom.
    pub bottom_min: f64,
    pub ascent_min: f64,
    pub safety_stop_min: f64,
    pub safety_stop_depth_m: f64,
    /// No-deco limit at the planned depth
    pub ndl_min: u32,
    pub points: Vec<ProfilePoint>,
}

impl DiveProfile {
    /// Compute the profile of a square dive to `depth` for `duration` minutes.
    pub fn compute(depth: f64, duration: f64, gas_mix: GasMix) -> Self {
        let depth = depth.max(0.0);
        let descent_min = (depth / DESCENT_RATE_M_MIN).min(MAX_DESCENT_MIN);
        let bottom_min = duration - descent_min - SAFETY_STOP_MIN;
        let ascent_min = (depth / ASCENT_RATE_M_MIN).min(MAX_ASCENT_MIN);

        let points = Phase::ALL
            .iter()
            .map(|phase| {
                let (depth_m, duration_min) = match phase {
                    Phase::Start => (0.0, None),
                    Phase::Descent => (depth, Some(descent_min)),
                    Phase::Bottom => (depth, Some(bottom_min)),
                    Phase::Ascent => (SAFETY_STOP_DEPTH_M, Some(ascent_min)),
                    Phase::SafetyStop => (SAFETY_STOP_DEPTH_M, Some(SAFETY_STOP_MIN)),
                    Phase::Surface => (0.0, None),
                };
                ProfilePoint {
                    phase: *phase,
                    depth_m,
                    duration_min,
                }
            })
            .collect();

        DiveProfile {
            descent_min,
            bottom_min,
            ascent_min,
            safety_stop_min: SAFETY_STOP_MIN,
            safety_stop_depth_m: SAFETY_STOP_DEPTH_M,
            ndl_min: calculate_ndl(depth, gas_mix),
            points,
        }
    }

    pub fn depths(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.depth_m).collect()
    }

    /// Whether the planned bottom time fits inside the no-deco limit.
    pub fn within_ndl(&self) -> bool {
        self.bottom_min <= f64::from(self.ndl_min)
    }
}
