//! Foreign bindings for the stateless calculators.
//!
//! Shells call these directly from input-change handlers, so every function
//! is synchronous and takes plain values: gas by tag (`air`, `nitrox32`,
//! `nitrox36`, `custom`) and dates as `YYYY-MM-DD`.

use chrono::NaiveDate;

use crate::gas::GasMix;
use crate::safety::{calculate_best_mix, calculate_ead, SafetySnapshot};
use crate::validator::{validate, DivePlanDraft};

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct SafetyFigures {
    pub o2_percentage: f64,
    pub mod_m: f64,
    pub ead_m: f64,
    pub ndl_min: u32,
    pub surface_interval_hours: String,
    pub safety_stop: String,
}

impl From<SafetySnapshot> for SafetyFigures {
    fn from(s: SafetySnapshot) -> Self {
        SafetyFigures {
            o2_percentage: s.o2_percentage,
            mod_m: s.mod_m,
            ead_m: s.ead_m,
            ndl_min: s.ndl_min,
            surface_interval_hours: s.surface_interval_hours,
            safety_stop: s.safety_stop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct PlanViolation {
    pub field: String,
    pub message: String,
}

#[uniffi::export]
pub fn safety_figures(depth_m: f64, gas_tag: String, custom_o2: Option<f64>) -> SafetyFigures {
    SafetySnapshot::compute(depth_m, GasMix::from_tag(&gas_tag, custom_o2)).into()
}

#[uniffi::export]
pub fn best_mix_label(target_depth_m: f64) -> String {
    calculate_best_mix(target_depth_m).label()
}

#[uniffi::export]
pub fn equivalent_air_depth(o2_percentage: f64, depth_m: f64) -> f64 {
    calculate_ead(o2_percentage, depth_m)
}

/// Validate plan form values. An unparseable date counts as missing.
#[uniffi::export]
pub fn validate_plan(
    site: String,
    date: Option<String>,
    max_depth_m: Option<f64>,
    duration_min: Option<f64>,
    gas_tag: String,
    custom_o2: Option<f64>,
) -> Vec<PlanViolation> {
    let draft = DivePlanDraft {
        site,
        date: date.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
        max_depth_m,
        duration_min,
        gas_mix: GasMix::from_tag(&gas_tag, custom_o2),
        ..Default::default()
    };
    validate(&draft)
        .into_iter()
        .map(|v| PlanViolation {
            field: v.field.as_str().to_string(),
            message: v.message,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_figures() {
        let figures = safety_figures(18.0, "nitrox32".to_string(), None);
        assert_eq!(figures.ndl_min, 72);
        assert_eq!(figures.o2_percentage, 32.0);
        assert_eq!(figures.surface_interval_hours, "2");
    }

    #[test]
    fn test_unknown_tag_is_air() {
        let figures = safety_figures(10.0, "trimix".to_string(), None);
        assert_eq!(figures.o2_percentage, 21.0);
        assert_eq!(figures.ndl_min, 200);
    }

    #[test]
    fn test_best_mix_label() {
        assert_eq!(best_mix_label(30.0), "Nitrox 32");
    }

    #[test]
    fn test_validate_plan() {
        let ok = validate_plan(
            "Reef".to_string(),
            Some("2025-06-01".to_string()),
            Some(18.0),
            Some(40.0),
            "air".to_string(),
            None,
        );
        assert!(ok.is_empty());

        let bad = validate_plan(
            String::new(),
            Some("01/06/2025".to_string()),
            Some(18.0),
            Some(40.0),
            "air".to_string(),
            None,
        );
        let fields: Vec<&str> = bad.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["site", "date"]);
    }
}
