pub mod checklist;
pub mod config;
pub mod error;
pub mod ffi;
pub mod gas;
pub mod logbook;
pub mod models;
pub mod planner;
pub mod profile;
pub mod safety;
pub mod storage;
pub mod timer;
pub mod validator;

uniffi::setup_scaffolding!();

pub use checklist::{Checklist, Completion};
pub use config::Settings;
pub use error::{ChecklistError, EntryError, ImportError, PlanRejected, StoreError};
pub use gas::{gas_label, resolve_o2_percentage, GasMix};
pub use logbook::{DateRange, LogEntryDraft, Logbook, LogbookFilter, Page};
pub use models::{
    CategoryId, ChecklistCategory, ChecklistData, ChecklistItem, DivePlan, EntryId, ItemId,
    Location, LogbookEntry, PlanId,
};
pub use planner::Planner;
pub use profile::DiveProfile;
pub use safety::{
    calculate_best_mix, calculate_ead, calculate_mod, calculate_ndl, calculate_surface_interval,
    BestMix, SafetySnapshot,
};
pub use storage::{KeyValueStore, MemoryStore};
pub use timer::{SafetyTimer, TimerEvent};
pub use validator::{validate, DivePlanDraft, Field, Violation};
