//! Gas mix selection and oxygen fraction resolution.

use serde::{Deserialize, Serialize};

/// Oxygen percentage of air, also the fallback for an unusable custom value.
pub const AIR_O2_PERCENTAGE: f64 = 21.0;

/// Highest oxygen percentage a custom mix may resolve to.
pub const MAX_O2_PERCENTAGE: f64 = 100.0;

pub const TAG_AIR: &str = "air";
pub const TAG_NITROX32: &str = "nitrox32";
pub const TAG_NITROX36: &str = "nitrox36";
pub const TAG_CUSTOM: &str = "custom";

/// Breathing gas selected for a dive.
///
/// `Custom` holds the percentage exactly as entered; `None` means the diver
/// picked a custom mix without supplying a usable number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GasRecord", into = "GasRecord")]
pub enum GasMix {
    #[default]
    Air,
    Nitrox32,
    Nitrox36,
    Custom(Option<f64>),
}

impl GasMix {
    /// Build a mix from a stored tag. Unknown tags resolve to air.
    pub fn from_tag(tag: &str, custom_percentage: Option<f64>) -> Self {
        match tag {
            TAG_NITROX32 => GasMix::Nitrox32,
            TAG_NITROX36 => GasMix::Nitrox36,
            TAG_CUSTOM => GasMix::Custom(custom_percentage),
            _ => GasMix::Air,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            GasMix::Air => TAG_AIR,
            GasMix::Nitrox32 => TAG_NITROX32,
            GasMix::Nitrox36 => TAG_NITROX36,
            GasMix::Custom(_) => TAG_CUSTOM,
        }
    }

    /// Percentage as entered for a custom mix.
    pub fn custom_percentage(&self) -> Option<f64> {
        match self {
            GasMix::Custom(p) => *p,
            _ => None,
        }
    }

    pub fn o2_percentage(&self) -> f64 {
        resolve_o2_percentage(*self)
    }

    pub fn label(&self) -> String {
        gas_label(self.tag(), self.custom_percentage())
    }
}

/// Resolve a gas selection to its oxygen percentage.
///
/// Custom percentages are clamped into [21, 100]. A missing or non-numeric
/// custom value resolves to 21 so downstream arithmetic stays defined; the
/// plan validator reports it separately.
pub fn resolve_o2_percentage(mix: GasMix) -> f64 {
    match mix {
        GasMix::Air => AIR_O2_PERCENTAGE,
        GasMix::Nitrox32 => 32.0,
        GasMix::Nitrox36 => 36.0,
        GasMix::Custom(Some(p)) if p.is_finite() => p.clamp(AIR_O2_PERCENTAGE, MAX_O2_PERCENTAGE),
        GasMix::Custom(_) => AIR_O2_PERCENTAGE,
    }
}

/// Display label for a gas tag. Unknown tags label as themselves.
pub fn gas_label(tag: &str, custom_percentage: Option<f64>) -> String {
    match tag {
        TAG_AIR => "Air (21% O₂)".to_string(),
        TAG_NITROX32 => "Nitrox 32".to_string(),
        TAG_NITROX36 => "Nitrox 36".to_string(),
        TAG_CUSTOM => match custom_percentage {
            Some(p) => format!("Nitrox {p}%"),
            None => "Nitrox (custom)".to_string(),
        },
        other => other.to_string(),
    }
}

/// Wire shape of a gas selection: `{"gasMix": "custom", "o2Percentage": 30}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct GasRecord {
    #[serde(rename = "gasMix")]
    gas_mix: String,
    #[serde(rename = "o2Percentage", default)]
    o2_percentage: Option<f64>,
}

impl From<GasRecord> for GasMix {
    fn from(record: GasRecord) -> Self {
        GasMix::from_tag(&record.gas_mix, record.o2_percentage)
    }
}

impl From<GasMix> for GasRecord {
    fn from(mix: GasMix) -> Self {
        GasRecord {
            gas_mix: mix.tag().to_string(),
            o2_percentage: mix.custom_percentage(),
        }
    }
}
