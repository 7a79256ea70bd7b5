//! Tunable defaults for the managers and the safety-stop timer.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::storage::{load_all, save_all, KeyValueStore, SETTINGS_KEY};

/// Settings record. Missing fields fall back to their defaults, so older
/// stored records keep loading as new settings are added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_entries_per_page")]
    pub entries_per_page: usize,
    #[serde(default = "default_safety_stop_sec")]
    pub safety_stop_sec: u32,
    #[serde(default = "default_low_time_sec")]
    pub low_time_sec: u32,
    #[serde(default = "default_extra_time_sec")]
    pub extra_time_sec: u32,
}

fn default_entries_per_page() -> usize {
    10
}

fn default_safety_stop_sec() -> u32 {
    180
}

fn default_low_time_sec() -> u32 {
    30
}

fn default_extra_time_sec() -> u32 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            entries_per_page: default_entries_per_page(),
            safety_stop_sec: default_safety_stop_sec(),
            low_time_sec: default_low_time_sec(),
            extra_time_sec: default_extra_time_sec(),
        }
    }
}

impl Settings {
    /// Stored settings, or defaults when none were saved.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(load_all(store, SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_all(store, SETTINGS_KEY, self)
    }
}
