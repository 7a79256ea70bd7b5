use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::gas::GasMix;
use crate::safety::SafetySnapshot;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// A saved dive plan. `safety` is the calculation as it stood when the plan
/// was saved; it is not recomputed on read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivePlan {
    pub id: PlanId,
    pub site: String,
    pub date: NaiveDate,
    #[serde(rename = "maxDepth")]
    pub max_depth_m: f64,
    #[serde(rename = "duration")]
    pub duration_min: f64,
    #[serde(rename = "waterTemp", default)]
    pub water_temp_c: Option<f64>,
    #[serde(flatten)]
    pub gas_mix: GasMix,
    #[serde(default)]
    pub objectives: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "deserialize_location")]
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub safety: Option<SafetySnapshot>,
}

impl DivePlan {
    /// Figures saved with the plan, or computed now for plans stored
    /// without a snapshot.
    pub fn safety_figures(&self) -> SafetySnapshot {
        self.safety
            .clone()
            .unwrap_or_else(|| SafetySnapshot::compute(self.max_depth_m, self.gas_mix))
    }
}

/// Stored plans may carry `{"lat": null, "lng": null}` when no point was picked.
fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct RawLocation {
        lat: Option<f64>,
        lng: Option<f64>,
    }

    let raw = Option::<RawLocation>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawLocation {
            lat: Some(lat),
            lng: Some(lng),
        }) => Some(Location { lat, lng }),
        _ => None,
    })
}

/// A logged dive. `gas_mix` is a plain tag; custom percentages are not kept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogbookEntry {
    #[serde(default)]
    pub id: EntryId,
    pub site: String,
    pub date: NaiveDate,
    pub depth: f64,
    pub duration: f64,
    #[serde(default)]
    pub temperature: Option<f64>,
    pub gas_mix: String,
    #[serde(default)]
    pub conditions: String,
    #[serde(default)]
    pub notes: String,
    /// Creation/edit instant in milliseconds since the epoch
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ItemId,
    pub category_id: CategoryId,
    pub text: String,
    pub checked: bool,
}

/// The whole checklist as persisted and exported. Vector order is the
/// manual ordering chosen by the diver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistData {
    pub categories: Vec<ChecklistCategory>,
    pub items: Vec<ChecklistItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_wire_format() {
        let json = r#"{
            "id": "1712650000000",
            "site": "Blue Lagoon",
            "date": "2025-04-09",
            "maxDepth": 18,
            "duration": 45,
            "waterTemp": null,
            "gasMix": "custom",
            "o2Percentage": 30,
            "objectives": "Fun dive",
            "notes": "",
            "location": {"lat": null, "lng": null},
            "createdAt": "2025-04-09T08:00:00Z"
        }"#;

        let plan: DivePlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.id, PlanId("1712650000000".to_string()));
        assert_eq!(plan.max_depth_m, 18.0);
        assert_eq!(plan.gas_mix, GasMix::Custom(Some(30.0)));
        assert_eq!(plan.location, None);
        assert!(plan.safety.is_none());
        assert_eq!(plan.safety_figures().ndl_min, 65);

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["maxDepth"], 18.0);
        assert_eq!(value["gasMix"], "custom");
        assert_eq!(value["o2Percentage"], 30.0);
    }

    #[test]
    fn test_plan_location() {
        let json = r#"{
            "id": "1", "site": "Reef", "date": "2025-04-09",
            "maxDepth": 12, "duration": 30, "gasMix": "air",
            "location": {"lat": 43.5, "lng": 7.1},
            "createdAt": "2025-04-09T08:00:00Z"
        }"#;
        let plan: DivePlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.location, Some(Location { lat: 43.5, lng: 7.1 }));
    }

    #[test]
    fn test_logbook_entry_without_id() {
        let json = r#"{
            "site": "Coral Garden", "date": "2025-04-08", "depth": 22,
            "duration": 50, "temperature": 23, "gasMix": "nitrox32",
            "conditions": "Calm", "notes": "", "timestamp": 1744070400000
        }"#;
        let entry: LogbookEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, EntryId(0));
        assert_eq!(entry.gas_mix, "nitrox32");
    }

    #[test]
    fn test_checklist_item_wire_format() {
        let item = ChecklistItem {
            id: ItemId(3),
            category_id: CategoryId(1),
            text: "Tank filled".to_string(),
            checked: false,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 3, "categoryId": 1, "text": "Tank filled", "checked": false})
        );
    }
}
