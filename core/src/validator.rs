//! Dive plan validation.
//!
//! Checks a draft plan against fixed recreational bounds and against the
//! MOD and NDL of its gas. Every rule runs; the result lists all violations
//! in rule order and is empty for a valid plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::gas::{resolve_o2_percentage, GasMix, AIR_O2_PERCENTAGE, MAX_O2_PERCENTAGE};
use crate::models::Location;
use crate::safety::{calculate_mod, calculate_ndl};

pub const MIN_PLAN_DEPTH_M: f64 = 1.0;
pub const MAX_PLAN_DEPTH_M: f64 = 40.0;
pub const MIN_PLAN_DURATION_MIN: f64 = 5.0;
pub const MAX_PLAN_DURATION_MIN: f64 = 180.0;

/// Plan fields as entered, before validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DivePlanDraft {
    pub site: String,
    pub date: Option<NaiveDate>,
    pub max_depth_m: Option<f64>,
    pub duration_min: Option<f64>,
    pub water_temp_c: Option<f64>,
    pub gas_mix: GasMix,
    pub objectives: String,
    pub notes: String,
    pub location: Option<Location>,
}

/// Form field a violation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Site,
    Date,
    MaxDepth,
    Duration,
    GasMix,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Site => "site",
            Field::Date => "date",
            Field::MaxDepth => "maxDepth",
            Field::Duration => "duration",
            Field::GasMix => "gasMix",
        }
    }
}

/// A single failed rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub field: Field,
    pub message: String,
}

impl Violation {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Violation {
            field,
            message: message.into(),
        }
    }
}

/// Validate a draft plan.
pub fn validate(plan: &DivePlanDraft) -> Vec<Violation> {
    let mut violations = Vec::new();
    let depth = present(plan.max_depth_m);
    let duration = present(plan.duration_min);

    if plan.site.trim().is_empty() {
        violations.push(Violation::new(Field::Site, "Dive site is required"));
    }

    if plan.date.is_none() {
        violations.push(Violation::new(Field::Date, "Date is required"));
    }

    match depth {
        None => violations.push(Violation::new(Field::MaxDepth, "Maximum depth is required")),
        Some(d) if !(MIN_PLAN_DEPTH_M..=MAX_PLAN_DEPTH_M).contains(&d) => {
            violations.push(Violation::new(
                Field::MaxDepth,
                format!("Maximum depth must be between {MIN_PLAN_DEPTH_M} and {MAX_PLAN_DEPTH_M} m"),
            ))
        }
        Some(_) => {}
    }

    match duration {
        None => violations.push(Violation::new(Field::Duration, "Duration is required")),
        Some(t) if !(MIN_PLAN_DURATION_MIN..=MAX_PLAN_DURATION_MIN).contains(&t) => {
            violations.push(Violation::new(
                Field::Duration,
                format!(
                    "Duration must be between {MIN_PLAN_DURATION_MIN} and {MAX_PLAN_DURATION_MIN} min"
                ),
            ))
        }
        Some(_) => {}
    }

    if let Some(depth) = depth {
        let mod_m = calculate_mod(resolve_o2_percentage(plan.gas_mix));
        if mod_m < depth {
            violations.push(Violation::new(
                Field::MaxDepth,
                format!("Maximum depth exceeds the MOD ({mod_m:.1} m) for this gas mix"),
            ));
        }

        if let Some(duration) = duration {
            let ndl = calculate_ndl(depth, plan.gas_mix);
            if f64::from(ndl) < duration {
                violations.push(Violation::new(
                    Field::Duration,
                    format!("Duration exceeds the no-decompression limit ({ndl} min) for this depth"),
                ));
            }
        }
    }

    if let GasMix::Custom(percentage) = plan.gas_mix {
        let valid = present(percentage)
            .map(|p| (AIR_O2_PERCENTAGE..=MAX_O2_PERCENTAGE).contains(&p))
            .unwrap_or(false);
        if !valid {
            violations.push(Violation::new(
                Field::GasMix,
                format!(
                    "Oxygen percentage must be between {AIR_O2_PERCENTAGE} and {MAX_O2_PERCENTAGE}%"
                ),
            ));
        }
    }

    violations
}

/// A numeric field counts as present only when it holds a finite number.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
