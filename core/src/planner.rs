//! Saved dive plans.
//!
//! `Planner` owns the plan collection. Saving validates the draft, captures
//! a safety snapshot and either replaces the plan being edited or appends a
//! new one. Persistence is explicit through `load`/`persist`.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{PlanRejected, StoreError};
use crate::models::{DivePlan, PlanId};
use crate::safety::SafetySnapshot;
use crate::storage::{load_all, save_all, KeyValueStore, PLANS_KEY};
use crate::validator::{validate, DivePlanDraft};

#[derive(Clone, Debug, Default)]
pub struct Planner {
    plans: Vec<DivePlan>,
}

impl Planner {
    pub fn new(plans: Vec<DivePlan>) -> Self {
        Planner { plans }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let plans: Vec<DivePlan> = load_all(store, PLANS_KEY)?.unwrap_or_default();
        debug!(count = plans.len(), "plans loaded");
        Ok(Planner { plans })
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_all(store, PLANS_KEY, &self.plans)
    }

    /// Plans in persisted order.
    pub fn plans(&self) -> &[DivePlan] {
        &self.plans
    }

    /// Plans for display, most recent dive date first.
    pub fn plans_by_date(&self) -> Vec<&DivePlan> {
        let mut plans: Vec<&DivePlan> = self.plans.iter().collect();
        plans.sort_by(|a, b| b.date.cmp(&a.date));
        plans
    }

    pub fn get(&self, id: &PlanId) -> Option<&DivePlan> {
        self.plans.iter().find(|p| &p.id == id)
    }

    /// Validate and store a plan.
    ///
    /// `editing` names the plan being edited and its id is kept. The plan
    /// replaces the one with that id, or is appended under it when that plan
    /// has since been deleted. Without `editing` the plan gets a fresh id
    /// derived from `now` and is appended.
    pub fn save_plan(
        &mut self,
        draft: DivePlanDraft,
        editing: Option<&PlanId>,
        now: DateTime<Utc>,
    ) -> Result<PlanId, PlanRejected> {
        // A missing date, depth or duration always yields a violation, so
        // a rejection never carries an empty list.
        let violations = validate(&draft);
        let (true, Some(date), Some(max_depth_m), Some(duration_min)) = (
            violations.is_empty(),
            draft.date,
            draft.max_depth_m,
            draft.duration_min,
        ) else {
            debug!(count = violations.len(), "plan rejected");
            return Err(PlanRejected { violations });
        };

        let id = match editing {
            Some(id) => id.clone(),
            None => self.mint_id(now),
        };

        let plan = DivePlan {
            id: id.clone(),
            site: draft.site.trim().to_string(),
            date,
            max_depth_m,
            duration_min,
            water_temp_c: draft.water_temp_c.filter(|t| t.is_finite()),
            gas_mix: draft.gas_mix,
            objectives: draft.objectives,
            notes: draft.notes,
            location: draft.location,
            created_at: now,
            safety: Some(SafetySnapshot::compute(max_depth_m, draft.gas_mix)),
        };

        match self.plans.iter().position(|p| p.id == id) {
            Some(index) => {
                self.plans[index] = plan;
                info!(plan_id = %id, "plan updated");
            }
            None => {
                self.plans.push(plan);
                info!(plan_id = %id, "plan created");
            }
        }
        Ok(id)
    }

    /// Remove a plan. Returns false when no plan has this id.
    pub fn delete_plan(&mut self, id: &PlanId) -> bool {
        let before = self.plans.len();
        self.plans.retain(|p| &p.id != id);
        let removed = self.plans.len() != before;
        if removed {
            info!(plan_id = %id, "plan deleted");
        }
        removed
    }

    /// Draft pre-filled from a saved plan, for editing.
    pub fn draft_for(&self, id: &PlanId) -> Option<DivePlanDraft> {
        self.get(id).map(|plan| DivePlanDraft {
            site: plan.site.clone(),
            date: Some(plan.date),
            max_depth_m: Some(plan.max_depth_m),
            duration_min: Some(plan.duration_min),
            water_temp_c: plan.water_temp_c,
            gas_mix: plan.gas_mix,
            objectives: plan.objectives.clone(),
            notes: plan.notes.clone(),
            location: plan.location,
        })
    }

    /// Creation time in milliseconds, bumped past any id already taken.
    fn mint_id(&self, now: DateTime<Utc>) -> PlanId {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = PlanId(millis.to_string());
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}
