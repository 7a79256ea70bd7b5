//! Pre-dive checklist: categories, items, completion and text import/export.

use tracing::{debug, info, warn};

use crate::error::{ChecklistError, ImportError, StoreError};
use crate::models::{CategoryId, ChecklistCategory, ChecklistData, ChecklistItem, ItemId};
use crate::storage::{load_all, next_id, save_all, KeyValueStore, CHECKLIST_KEY};

/// Checked items out of the total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty checklist
    pub percentage: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Checklist {
    data: ChecklistData,
}

impl Checklist {
    pub fn new(data: ChecklistData) -> Self {
        Checklist { data }
    }

    /// Load the checklist, falling back to the default one when none is stored.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let data = match load_all(store, CHECKLIST_KEY)? {
            Some(data) => data,
            None => {
                debug!("no checklist stored, using defaults");
                default_checklist()
            }
        };
        Ok(Checklist { data })
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_all(store, CHECKLIST_KEY, &self.data)
    }

    pub fn data(&self) -> &ChecklistData {
        &self.data
    }

    /// Categories in persisted (manual) order.
    pub fn categories(&self) -> &[ChecklistCategory] {
        &self.data.categories
    }

    /// Categories sorted by name, for menus.
    pub fn categories_by_name(&self) -> Vec<&ChecklistCategory> {
        let mut categories: Vec<&ChecklistCategory> = self.data.categories.iter().collect();
        categories.sort_by_key(|c| c.name.to_lowercase());
        categories
    }

    /// Items of one category in persisted order.
    pub fn items_in(&self, category_id: CategoryId) -> Vec<&ChecklistItem> {
        self.data
            .items
            .iter()
            .filter(|i| i.category_id == category_id)
            .collect()
    }

    pub fn category(&self, id: CategoryId) -> Option<&ChecklistCategory> {
        self.data.categories.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&ChecklistItem> {
        self.data.items.iter().find(|i| i.id == id)
    }

    pub fn add_category(
        &mut self,
        name: &str,
        icon: &str,
        color: &str,
    ) -> Result<CategoryId, ChecklistError> {
        let name = required(name, ChecklistError::EmptyName)?;
        let id = CategoryId(next_id(self.data.categories.iter().map(|c| c.id.0)));
        self.data.categories.push(ChecklistCategory {
            id,
            name,
            icon: icon.to_string(),
            color: color.to_string(),
        });
        debug!(category_id = %id, "category added");
        Ok(id)
    }

    pub fn add_item(&mut self, category_id: CategoryId, text: &str) -> Result<ItemId, ChecklistError> {
        let text = required(text, ChecklistError::EmptyText)?;
        self.ensure_category(category_id)?;
        let id = ItemId(next_id(self.data.items.iter().map(|i| i.id.0)));
        self.data.items.push(ChecklistItem {
            id,
            category_id,
            text,
            checked: false,
        });
        debug!(item_id = %id, "item added");
        Ok(id)
    }

    /// `Ok(false)` when the category does not exist.
    pub fn update_category(
        &mut self,
        id: CategoryId,
        name: &str,
        icon: &str,
        color: &str,
    ) -> Result<bool, ChecklistError> {
        let name = required(name, ChecklistError::EmptyName)?;
        let Some(category) = self.data.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        category.name = name;
        category.icon = icon.to_string();
        category.color = color.to_string();
        Ok(true)
    }

    /// Change an item's text and category; its checked state is kept.
    /// `Ok(false)` when the item does not exist.
    pub fn update_item(
        &mut self,
        id: ItemId,
        text: &str,
        category_id: CategoryId,
    ) -> Result<bool, ChecklistError> {
        let text = required(text, ChecklistError::EmptyText)?;
        self.ensure_category(category_id)?;
        let Some(item) = self.data.items.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        item.text = text;
        item.category_id = category_id;
        Ok(true)
    }

    /// Remove a category and every item in it.
    pub fn delete_category(&mut self, id: CategoryId) -> bool {
        let before = self.data.categories.len();
        self.data.categories.retain(|c| c.id != id);
        if self.data.categories.len() == before {
            return false;
        }
        self.data.items.retain(|i| i.category_id != id);
        info!(category_id = %id, "category deleted with its items");
        true
    }

    pub fn delete_item(&mut self, id: ItemId) -> bool {
        let before = self.data.items.len();
        self.data.items.retain(|i| i.id != id);
        self.data.items.len() != before
    }

    /// Flip an item; returns its new state.
    pub fn toggle_item(&mut self, id: ItemId) -> Option<bool> {
        let item = self.data.items.iter_mut().find(|i| i.id == id)?;
        item.checked = !item.checked;
        Some(item.checked)
    }

    /// Uncheck everything.
    pub fn reset(&mut self) {
        for item in &mut self.data.items {
            item.checked = false;
        }
    }

    pub fn completion(&self) -> Completion {
        let total = self.data.items.len();
        let completed = self.data.items.iter().filter(|i| i.checked).count();
        let percentage = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Completion {
            completed,
            total,
            percentage,
        }
    }

    /// Move a category to `position` in the manual order (clamped to the end).
    pub fn move_category(&mut self, id: CategoryId, position: usize) -> bool {
        move_to(&mut self.data.categories, |c| c.id == id, position)
    }

    /// Move an item to `position` among all items (clamped to the end).
    pub fn move_item(&mut self, id: ItemId, position: usize) -> bool {
        move_to(&mut self.data.items, |i| i.id == id, position)
    }

    /// Pretty-printed JSON of the whole checklist.
    pub fn export(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.data).map_err(|e| StoreError::Encode {
            key: CHECKLIST_KEY.to_string(),
            message: e.to_string(),
        })
    }

    /// Replace the checklist with exported text. On any error the current
    /// checklist is left untouched.
    pub fn import(&mut self, text: &str) -> Result<(), ImportError> {
        match parse_import(text) {
            Ok(data) => {
                info!(
                    categories = data.categories.len(),
                    items = data.items.len(),
                    "checklist imported"
                );
                self.data = data;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "checklist import rejected");
                Err(err)
            }
        }
    }

    fn ensure_category(&self, id: CategoryId) -> Result<(), ChecklistError> {
        match self.category(id) {
            Some(_) => Ok(()),
            None => Err(ChecklistError::UnknownCategory(id)),
        }
    }
}

fn required(value: &str, err: ChecklistError) -> Result<String, ChecklistError> {
    let value = value.trim();
    if value.is_empty() {
        Err(err)
    } else {
        Ok(value.to_string())
    }
}

fn move_to<T>(list: &mut Vec<T>, pred: impl Fn(&T) -> bool, position: usize) -> bool {
    let Some(from) = list.iter().position(pred) else {
        return false;
    };
    let element = list.remove(from);
    let to = position.min(list.len());
    list.insert(to, element);
    true
}

fn parse_import(text: &str) -> Result<ChecklistData, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    let value: serde_json::Value = serde_json::from_str(text)?;
    for key in ["categories", "items"] {
        if !value.get(key).is_some_and(|v| v.is_array()) {
            return Err(ImportError::MissingArray(key));
        }
    }
    serde_json::from_value(value).map_err(|e| ImportError::InvalidRecord(e.to_string()))
}

fn default_checklist() -> ChecklistData {
    let category = |id, name: &str, icon: &str, color: &str| ChecklistCategory {
        id: CategoryId(id),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
    };
    let item = |id, category_id, text: &str| ChecklistItem {
        id: ItemId(id),
        category_id: CategoryId(category_id),
        text: text.to_string(),
        checked: false,
    };

    ChecklistData {
        categories: vec![
            category(1, "Main Equipment", "suitcase", "blue"),
            category(2, "Personal Equipment", "user", "purple"),
            category(3, "Safety Equipment", "shield-alt", "yellow"),
        ],
        items: vec![
            item(1, 1, "BCD checked"),
            item(2, 1, "Regulators tested"),
            item(3, 1, "Tank filled and tested"),
            item(4, 2, "Mask and snorkel"),
            item(5, 2, "Suitable wetsuit"),
            item(6, 3, "Surface marker buoy"),
            item(7, 3, "Knife / cutting tool"),
        ],
    }
}
