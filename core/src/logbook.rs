//! Logbook of completed dives: entry checks, filtering and pagination.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{EntryError, StoreError};
use crate::models::{EntryId, LogbookEntry};
use crate::storage::{load_all, next_id, save_all, KeyValueStore, LOGBOOK_KEY};

pub const MAX_ENTRY_DEPTH_M: f64 = 40.0;
pub const MAX_ENTRY_DURATION_MIN: f64 = 180.0;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Entry fields as typed by the diver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogEntryDraft {
    pub site: String,
    pub date: Option<NaiveDate>,
    pub depth: Option<f64>,
    pub duration: Option<f64>,
    pub temperature: Option<f64>,
    pub gas_mix: String,
    pub conditions: String,
    pub notes: String,
}

/// Check a draft. Reports the first problem found.
pub fn validate_entry(draft: &LogEntryDraft) -> Result<(), EntryError> {
    if draft.site.trim().is_empty() {
        return Err(EntryError::MissingField("site"));
    }
    if draft.date.is_none() {
        return Err(EntryError::MissingField("date"));
    }
    let depth = draft
        .depth
        .filter(|d| d.is_finite())
        .ok_or(EntryError::MissingField("depth"))?;
    let duration = draft
        .duration
        .filter(|d| d.is_finite())
        .ok_or(EntryError::MissingField("duration"))?;

    if depth <= 0.0 || depth > MAX_ENTRY_DEPTH_M {
        return Err(EntryError::DepthOutOfRange(depth));
    }
    if duration <= 0.0 || duration > MAX_ENTRY_DURATION_MIN {
        return Err(EntryError::DurationOutOfRange(duration));
    }
    Ok(())
}

/// Relative or explicit window on the dive date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Yesterday,
    /// Dived within the last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Last 90 days
    ThreeMonths,
    /// Last 180 days
    SixMonths,
    /// Last 365 days
    Year,
    /// Inclusive bounds; a missing bound is open
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let age_days = (today - date).num_days();
        match self {
            DateRange::All => true,
            DateRange::Today => date == today,
            DateRange::Yesterday => Some(date) == today.pred_opt(),
            DateRange::Week => age_days <= 7,
            DateRange::Month => age_days <= 30,
            DateRange::ThreeMonths => age_days <= 90,
            DateRange::SixMonths => age_days <= 180,
            DateRange::Year => age_days <= 365,
            DateRange::Custom { from, to } => {
                from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
            }
        }
    }
}

/// Active logbook filters. `None` means "all".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogbookFilter {
    pub date_range: DateRange,
    pub year: Option<i32>,
    /// 1-12
    pub month: Option<u32>,
    /// Case-insensitive substring of the site name
    pub site: Option<String>,
    /// Exact gas tag
    pub gas_mix: Option<String>,
}

impl LogbookFilter {
    pub fn matches(&self, entry: &LogbookEntry, today: NaiveDate) -> bool {
        self.date_range.contains(entry.date, today)
            && self.year.map_or(true, |y| entry.date.year() == y)
            && self.month.map_or(true, |m| entry.date.month() == m)
            && self.site.as_deref().map_or(true, |site| {
                entry.site.to_lowercase().contains(&site.to_lowercase())
            })
            && self.gas_mix.as_deref().map_or(true, |gas| entry.gas_mix == gas)
    }
}

/// One page of filtered entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<'a> {
    pub entries: Vec<&'a LogbookEntry>,
    /// 1-based page number
    pub number: usize,
    /// 0-based index of the first entry shown
    pub start: usize,
    /// Exclusive end index, never past `total`
    pub end: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// The logbook and its current view (filters and page).
#[derive(Clone, Debug)]
pub struct Logbook {
    entries: Vec<LogbookEntry>,
    filter: LogbookFilter,
    current_page: usize,
    entries_per_page: usize,
}

impl Logbook {
    pub fn new(entries: Vec<LogbookEntry>, settings: &Settings) -> Self {
        let mut logbook = Logbook {
            entries,
            filter: LogbookFilter::default(),
            current_page: 1,
            entries_per_page: settings.entries_per_page.max(1),
        };
        logbook.assign_missing_ids();
        logbook
    }

    /// Load the logbook, seeding sample dives when nothing was stored yet.
    pub fn load<S: KeyValueStore + ?Sized>(
        store: &S,
        settings: &Settings,
        now_ms: i64,
    ) -> Result<Self, StoreError> {
        let entries = match load_all::<Vec<LogbookEntry>, _>(store, LOGBOOK_KEY)? {
            Some(entries) => entries,
            None => {
                debug!("no logbook stored, seeding sample entries");
                sample_entries(now_ms)
            }
        };
        Ok(Logbook::new(entries, settings))
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_all(store, LOGBOOK_KEY, &self.entries)
    }

    pub fn entries(&self) -> &[LogbookEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&LogbookEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn add_entry(&mut self, draft: LogEntryDraft, now_ms: i64) -> Result<EntryId, EntryError> {
        let entry = build_entry(self.next_id(), draft, now_ms)?;
        let id = entry.id;
        self.entries.push(entry);
        info!(entry_id = %id, "logbook entry added");
        Ok(id)
    }

    /// Replace an entry's fields and re-stamp it. `Ok(false)` when the id
    /// is unknown.
    pub fn edit_entry(
        &mut self,
        id: EntryId,
        draft: LogEntryDraft,
        now_ms: i64,
    ) -> Result<bool, EntryError> {
        let entry = build_entry(id, draft, now_ms)?;
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                *existing = entry;
                info!(entry_id = %id, "logbook entry updated");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_entry(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            info!(entry_id = %id, "logbook entry deleted");
        }
        removed
    }

    pub fn filter(&self) -> &LogbookFilter {
        &self.filter
    }

    /// Change filters and go back to the first page.
    pub fn set_filter(&mut self, filter: LogbookFilter) {
        self.filter = filter;
        self.current_page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.set_filter(LogbookFilter::default());
    }

    /// Entries passing the filters, most recent dive first.
    pub fn filtered(&self, today: NaiveDate) -> Vec<&LogbookEntry> {
        let mut entries: Vec<&LogbookEntry> = self
            .entries
            .iter()
            .filter(|e| self.filter.matches(e, today))
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    pub fn total_pages(&self, today: NaiveDate) -> usize {
        self.filtered(today).len().div_ceil(self.entries_per_page)
    }

    pub fn current_page(&self, today: NaiveDate) -> Page<'_> {
        let filtered = self.filtered(today);
        let total = filtered.len();
        // Deletions can leave the stored page past the end.
        let number = self
            .current_page
            .min(total.div_ceil(self.entries_per_page).max(1));
        let start = (number - 1) * self.entries_per_page;
        let end = (start + self.entries_per_page).min(total);
        let entries = filtered.into_iter().skip(start).take(self.entries_per_page).collect();

        Page {
            entries,
            number,
            start,
            end,
            total,
            has_previous: number > 1,
            has_next: start + self.entries_per_page < total,
        }
    }

    /// Advance one page. False when already on the last page.
    pub fn next_page(&mut self, today: NaiveDate) -> bool {
        self.clamp_page(today);
        if self.current_page < self.total_pages(today) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Step back one page. False when already on the first page.
    pub fn previous_page(&mut self, today: NaiveDate) -> bool {
        self.clamp_page(today);
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Distinct sites, in first-logged order.
    pub fn sites(&self) -> Vec<&str> {
        let mut sites: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !sites.contains(&entry.site.as_str()) {
                sites.push(&entry.site);
            }
        }
        sites
    }

    /// Distinct years, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.entries.iter().map(|e| e.date.year()).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Pull the stored page back inside the filtered range.
    fn clamp_page(&mut self, today: NaiveDate) {
        self.current_page = self.current_page.clamp(1, self.total_pages(today).max(1));
    }

    fn next_id(&self) -> EntryId {
        EntryId(next_id(self.entries.iter().map(|e| e.id.0)))
    }

    /// Entries stored before ids existed all decode as id 0.
    fn assign_missing_ids(&mut self) {
        let mut next = next_id(self.entries.iter().map(|e| e.id.0));
        for entry in self.entries.iter_mut().filter(|e| e.id.0 == 0) {
            entry.id = EntryId(next);
            next += 1;
        }
    }
}

fn build_entry(id: EntryId, draft: LogEntryDraft, now_ms: i64) -> Result<LogbookEntry, EntryError> {
    validate_entry(&draft)?;
    let (Some(date), Some(depth), Some(duration)) = (draft.date, draft.depth, draft.duration) else {
        return Err(EntryError::MissingField("date"));
    };
    Ok(LogbookEntry {
        id,
        site: draft.site.trim().to_string(),
        date,
        depth,
        duration,
        temperature: draft.temperature.filter(|t| t.is_finite()),
        gas_mix: draft.gas_mix,
        conditions: draft.conditions,
        notes: draft.notes,
        timestamp: now_ms,
    })
}

fn sample_entries(now_ms: i64) -> Vec<LogbookEntry> {
    vec![
        LogbookEntry {
            id: EntryId(1),
            site: "Blue Lagoon".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 9).unwrap_or_default(),
            depth: 18.0,
            duration: 45.0,
            temperature: Some(24.0),
            gas_mix: "air".to_string(),
            conditions: "Excellent visibility, light current".to_string(),
            notes: "Several sea turtles and a reef shark".to_string(),
            timestamp: now_ms,
        },
        LogbookEntry {
            id: EntryId(2),
            site: "Coral Garden".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 8).unwrap_or_default(),
            depth: 22.0,
            duration: 50.0,
            temperature: Some(23.0),
            gas_mix: "nitrox32".to_string(),
            conditions: "Moderate visibility, no current".to_string(),
            notes: "Beautiful coral formations".to_string(),
            timestamp: now_ms - DAY_MS,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const NOW_MS: i64 = 1_744_200_000_000;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(site: &str, day: NaiveDate, gas: &str) -> LogEntryDraft {
        LogEntryDraft {
            site: site.to_string(),
            date: Some(day),
            depth: Some(18.0),
            duration: Some(45.0),
            gas_mix: gas.to_string(),
            ..Default::default()
        }
    }

    fn logbook_with(drafts: Vec<LogEntryDraft>, per_page: usize) -> Logbook {
        let settings = Settings {
            entries_per_page: per_page,
            ..Settings::default()
        };
        let mut logbook = Logbook::new(Vec::new(), &settings);
        for d in drafts {
            logbook.add_entry(d, NOW_MS).unwrap();
        }
        logbook
    }

    #[test]
    fn test_validate_entry() {
        let ok = draft("Reef", date(2025, 4, 9), "air");
        assert!(validate_entry(&ok).is_ok());

        let mut bad = ok.clone();
        bad.site = String::new();
        assert_eq!(validate_entry(&bad), Err(EntryError::MissingField("site")));

        let mut bad = ok.clone();
        bad.depth = Some(0.0);
        assert_eq!(validate_entry(&bad), Err(EntryError::DepthOutOfRange(0.0)));

        let mut bad = ok.clone();
        bad.depth = Some(40.5);
        assert_eq!(validate_entry(&bad), Err(EntryError::DepthOutOfRange(40.5)));

        let mut bad = ok.clone();
        bad.duration = Some(181.0);
        assert_eq!(validate_entry(&bad), Err(EntryError::DurationOutOfRange(181.0)));

        let mut bad = ok;
        bad.duration = None;
        assert_eq!(validate_entry(&bad), Err(EntryError::MissingField("duration")));
    }

    #[test]
    fn test_boundaries_accepted() {
        let mut d = draft("Reef", date(2025, 4, 9), "air");
        d.depth = Some(40.0);
        d.duration = Some(180.0);
        assert!(validate_entry(&d).is_ok());
    }

    #[test]
    fn test_add_edit_delete() {
        let mut logbook = logbook_with(vec![], 10);
        let id = logbook
            .add_entry(draft("Reef", date(2025, 4, 9), "air"), NOW_MS)
            .unwrap();
        assert_eq!(id, EntryId(1));
        assert_eq!(logbook.get(id).unwrap().timestamp, NOW_MS);

        let mut edited = draft("Wreck", date(2025, 4, 9), "nitrox32");
        edited.depth = Some(25.0);
        assert_eq!(logbook.edit_entry(id, edited, NOW_MS + 5), Ok(true));
        let entry = logbook.get(id).unwrap();
        assert_eq!(entry.site, "Wreck");
        assert_eq!(entry.timestamp, NOW_MS + 5);

        assert!(logbook.delete_entry(id));
        assert!(logbook.entries().is_empty());
    }

    #[test]
    fn test_invalid_add_leaves_logbook_unchanged() {
        let mut logbook = logbook_with(vec![draft("Reef", date(2025, 4, 9), "air")], 10);
        let mut bad = draft("Deep", date(2025, 4, 9), "air");
        bad.depth = Some(55.0);
        assert!(logbook.add_entry(bad, NOW_MS).is_err());
        assert_eq!(logbook.entries().len(), 1);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut logbook = logbook_with(vec![draft("Reef", date(2025, 4, 9), "air")], 10);
        let before = logbook.entries().to_vec();

        assert!(!logbook.delete_entry(EntryId(42)));
        assert_eq!(
            logbook.edit_entry(EntryId(42), draft("X", date(2025, 4, 9), "air"), NOW_MS),
            Ok(false)
        );
        assert_eq!(logbook.entries(), before.as_slice());
    }

    #[test]
    fn test_filters() {
        let today = date(2025, 4, 10);
        let logbook = logbook_with(
            vec![
                draft("Blue Lagoon", date(2025, 4, 10), "air"),
                draft("Coral Garden", date(2025, 4, 9), "nitrox32"),
                draft("Blue Hole", date(2025, 3, 1), "air"),
                draft("Wreck", date(2024, 4, 1), "nitrox36"),
            ],
            10,
        );
        let sites = |filter: LogbookFilter| -> Vec<String> {
            let mut logbook = logbook.clone();
            logbook.set_filter(filter);
            logbook.filtered(today).iter().map(|e| e.site.clone()).collect()
        };

        assert_eq!(
            sites(LogbookFilter::default()),
            vec!["Blue Lagoon", "Coral Garden", "Blue Hole", "Wreck"]
        );
        assert_eq!(
            sites(LogbookFilter {
                date_range: DateRange::Today,
                ..Default::default()
            }),
            vec!["Blue Lagoon"]
        );
        assert_eq!(
            sites(LogbookFilter {
                date_range: DateRange::Yesterday,
                ..Default::default()
            }),
            vec!["Coral Garden"]
        );
        assert_eq!(
            sites(LogbookFilter {
                date_range: DateRange::Month,
                ..Default::default()
            }),
            vec!["Blue Lagoon", "Coral Garden"]
        );
        assert_eq!(
            sites(LogbookFilter {
                site: Some("blue".to_string()),
                ..Default::default()
            }),
            vec!["Blue Lagoon", "Blue Hole"]
        );
        assert_eq!(
            sites(LogbookFilter {
                year: Some(2025),
                month: Some(3),
                ..Default::default()
            }),
            vec!["Blue Hole"]
        );
        assert_eq!(
            sites(LogbookFilter {
                gas_mix: Some("nitrox36".to_string()),
                ..Default::default()
            }),
            vec!["Wreck"]
        );
        assert_eq!(
            sites(LogbookFilter {
                date_range: DateRange::Custom {
                    from: Some(date(2025, 3, 1)),
                    to: Some(date(2025, 4, 9)),
                },
                ..Default::default()
            }),
            vec!["Coral Garden", "Blue Hole"]
        );
    }

    #[test]
    fn test_pagination() {
        let today = date(2025, 4, 30);
        let drafts = (1..=25)
            .map(|day| draft("Reef", date(2025, 4, day), "air"))
            .collect();
        let mut logbook = logbook_with(drafts, 10);
        assert_eq!(logbook.total_pages(today), 3);

        let page = logbook.current_page(today);
        assert_eq!((page.start, page.end, page.total), (0, 10, 25));
        assert_eq!(page.entries[0].date, date(2025, 4, 25));
        assert!(!page.has_previous);
        assert!(page.has_next);

        assert!(logbook.next_page(today));
        assert!(logbook.next_page(today));
        assert!(!logbook.next_page(today));
        let page = logbook.current_page(today);
        assert_eq!((page.number, page.start, page.end), (3, 20, 25));
        assert_eq!(page.entries.len(), 5);
        assert!(!page.has_next);

        for id in 1..=10 {
            logbook.delete_entry(EntryId(id));
        }
        let page = logbook.current_page(today);
        assert_eq!((page.number, page.start, page.end), (2, 10, 15));

        logbook.set_filter(LogbookFilter {
            site: Some("reef".to_string()),
            ..Default::default()
        });
        assert_eq!(logbook.current_page(today).number, 1);
        assert!(!logbook.previous_page(today));
    }

    #[test]
    fn test_page_steps_after_deletions() {
        let today = date(2025, 4, 30);
        let drafts = (1..=25)
            .map(|day| draft("Reef", date(2025, 4, day), "air"))
            .collect();
        let mut logbook = logbook_with(drafts, 10);
        assert!(logbook.next_page(today));
        assert!(logbook.next_page(today));

        for id in 1..=20 {
            logbook.delete_entry(EntryId(id));
        }
        let page = logbook.current_page(today);
        assert_eq!(page.number, 1);
        assert!(!page.has_previous);
        assert!(!logbook.previous_page(today));
        assert!(!logbook.next_page(today));

        // Growing back does not jump to the old page.
        for day in 1..=20 {
            logbook
                .add_entry(draft("Reef", date(2025, 3, day), "air"), NOW_MS)
                .unwrap();
        }
        assert_eq!(logbook.current_page(today).number, 1);
        assert!(logbook.next_page(today));
        assert_eq!(logbook.current_page(today).number, 2);
        assert!(logbook.previous_page(today));
        assert_eq!(logbook.current_page(today).number, 1);
    }

    #[test]
    fn test_option_lists() {
        let logbook = logbook_with(
            vec![
                draft("Reef", date(2023, 5, 1), "air"),
                draft("Wreck", date(2025, 5, 1), "air"),
                draft("Reef", date(2024, 5, 1), "air"),
            ],
            10,
        );
        assert_eq!(logbook.sites(), vec!["Reef", "Wreck"]);
        assert_eq!(logbook.years(), vec![2025, 2024, 2023]);
    }

    #[test]
    fn test_load_seeds_samples() {
        let store = MemoryStore::new();
        let logbook = Logbook::load(&store, &Settings::default(), NOW_MS).unwrap();
        assert_eq!(logbook.sites(), vec!["Blue Lagoon", "Coral Garden"]);
        assert_eq!(logbook.entries()[1].timestamp, NOW_MS - DAY_MS);
    }

    #[test]
    fn test_load_assigns_ids_to_legacy_entries() {
        let mut store = MemoryStore::new();
        store
            .set(
                LOGBOOK_KEY,
                r#"[
                    {"site": "A", "date": "2025-04-01", "depth": 10, "duration": 30,
                     "gasMix": "air", "timestamp": 1},
                    {"site": "B", "date": "2025-04-02", "depth": 12, "duration": 30,
                     "gasMix": "air", "timestamp": 2}
                ]"#
                .to_string(),
            )
            .unwrap();
        let logbook = Logbook::load(&store, &Settings::default(), NOW_MS).unwrap();
        let ids: Vec<EntryId> = logbook.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntryId(1), EntryId(2)]);
    }
}
