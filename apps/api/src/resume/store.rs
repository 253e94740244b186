//! Resume Store: single source of truth for the resume aggregate.
//!
//! Every operation validates its input completely before touching state, so a
//! failed call leaves the aggregate and the id counters exactly as they were.
//! The store is a plain owned value; callers that share it across requests
//! wrap it in a lock (see `AppState`).

use std::collections::HashSet;

use chrono::Utc;
use tracing::info;

use crate::errors::StoreError;
use crate::resume::models::{
    Category, CategoryId, Columns, Entry, EntryId, EntryPatch, IdCounters, NewEntry, PersonalInfo,
    PersonalInfoInput, Resume, ResumeRecord, ResumeSnapshot, Settings, SettingsInput, Skill,
    SkillId, SKILL_LEVEL_MAX, SKILL_LEVEL_MIN,
};

#[derive(Debug, Clone, Default)]
pub struct ResumeStore {
    resume: Resume,
    next_ids: IdCounters,
}

impl ResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a persisted record, rejecting records that break
    /// the aggregate's invariants.
    pub fn from_record(record: ResumeRecord) -> Result<Self, StoreError> {
        let ResumeRecord {
            resume,
            mut next_ids,
        } = record;

        let mut category_ids = HashSet::new();
        let mut category_names = HashSet::new();
        let mut entry_ids = HashSet::new();
        for category in &resume.categories {
            if !category_ids.insert(category.id) {
                return Err(StoreError::Validation(format!(
                    "duplicate id: {}",
                    category.id
                )));
            }
            require_name(&category.name, "category name")?;
            if !category_names.insert(category.name.as_str()) {
                return Err(StoreError::Validation(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }
            for entry in &category.entries {
                if !entry_ids.insert(entry.id) {
                    return Err(StoreError::Validation(format!("duplicate id: {}", entry.id)));
                }
                require_name(&entry.name, "entry name")?;
            }
        }

        let mut skill_ids = HashSet::new();
        for skill in &resume.skills {
            if !skill_ids.insert(skill.id) {
                return Err(StoreError::Validation(format!("duplicate id: {}", skill.id)));
            }
            require_name(&skill.name, "skill name")?;
            check_level(i64::from(skill.level))?;
        }

        // A hand-edited record may carry counters behind its own ids.
        next_ids.next_category = next_ids
            .next_category
            .max(counter_floor(category_ids.iter().map(|id| id.0), "category")?);
        next_ids.next_entry = next_ids
            .next_entry
            .max(counter_floor(entry_ids.iter().map(|id| id.0), "entry")?);
        next_ids.next_skill = next_ids
            .next_skill
            .max(counter_floor(skill_ids.iter().map(|id| id.0), "skill")?);

        Ok(Self { resume, next_ids })
    }

    pub fn to_record(&self) -> ResumeRecord {
        ResumeRecord {
            resume: self.resume.clone(),
            next_ids: self.next_ids,
        }
    }

    /// Returns an owned copy of the whole aggregate taken at this instant.
    pub fn snapshot(&self) -> ResumeSnapshot {
        self.resume.clone()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Personal info & settings
    // ────────────────────────────────────────────────────────────────────────

    /// Overwrites the personal info unconditionally. Empty strings are allowed.
    pub fn set_personal_info(&mut self, input: PersonalInfoInput) -> PersonalInfo {
        self.resume.personal = PersonalInfo {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address: input.address.trim().to_string(),
            dob: input.dob.trim().to_string(),
            summary: input.summary.trim().to_string(),
            updated_at: Some(Utc::now()),
        };
        info!("Personal info updated");
        self.resume.personal.clone()
    }

    pub fn update_settings(&mut self, input: SettingsInput) -> Result<Settings, StoreError> {
        let mut settings = self.resume.settings;
        if let Some(columns) = input.columns {
            let raw = u8::try_from(columns).map_err(|_| {
                StoreError::Validation(format!("columns must be 1 or 2, got {columns}"))
            })?;
            settings.columns = Columns::try_from(raw).map_err(StoreError::Validation)?;
        }
        if let Some(separator) = input.separator {
            settings.separator = separator;
        }
        self.resume.settings = settings;
        info!(
            columns = settings.columns.count(),
            separator = settings.separator,
            "Settings updated"
        );
        Ok(settings)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Categories
    // ────────────────────────────────────────────────────────────────────────

    pub fn add_category(&mut self, name: &str) -> Result<CategoryId, StoreError> {
        let name = require_name(name, "category name")?;
        if self.resume.categories.iter().any(|c| c.name == name) {
            return Err(StoreError::Validation(format!("category '{name}' already exists")));
        }

        let id = CategoryId(take_id(&mut self.next_ids.next_category, "category")?);
        self.resume.categories.push(Category {
            id,
            name: name.to_string(),
            entries: Vec::new(),
        });
        info!(category_id = id.0, "Category added: {name}");
        Ok(id)
    }

    /// Removes a category together with every entry it holds.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<Category, StoreError> {
        let idx = self.category_index(id)?;
        let removed = self.resume.categories.remove(idx);
        info!(
            category_id = id.0,
            entries = removed.entries.len(),
            "Category deleted"
        );
        Ok(removed)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Entries
    // ────────────────────────────────────────────────────────────────────────

    pub fn add_entry(
        &mut self,
        category_id: CategoryId,
        entry: NewEntry,
    ) -> Result<EntryId, StoreError> {
        let idx = self.category_index(category_id)?;
        let name = require_name(&entry.name, "entry name")?.to_string();

        let id = EntryId(take_id(&mut self.next_ids.next_entry, "entry")?);
        self.resume.categories[idx].entries.push(Entry {
            id,
            name,
            link: optional_field(entry.link.as_deref()),
            date: optional_field(entry.date.as_deref()),
        });
        info!(category_id = category_id.0, entry_id = id.0, "Entry added");
        Ok(id)
    }

    /// Applies the provided subset of fields in place; the entry keeps its position.
    pub fn edit_entry(
        &mut self,
        category_id: CategoryId,
        entry_id: EntryId,
        patch: EntryPatch,
    ) -> Result<Entry, StoreError> {
        let (cat_idx, entry_idx) = self.entry_index(category_id, entry_id)?;
        let name = match patch.name.as_deref() {
            Some(name) => Some(require_name(name, "entry name")?.to_string()),
            None => None,
        };

        let entry = &mut self.resume.categories[cat_idx].entries[entry_idx];
        if let Some(name) = name {
            entry.name = name;
        }
        if let Some(link) = patch.link.as_deref() {
            entry.link = optional_field(Some(link));
        }
        if let Some(date) = patch.date.as_deref() {
            entry.date = optional_field(Some(date));
        }
        info!(category_id = category_id.0, entry_id = entry_id.0, "Entry edited");
        Ok(entry.clone())
    }

    pub fn delete_entry(
        &mut self,
        category_id: CategoryId,
        entry_id: EntryId,
    ) -> Result<Entry, StoreError> {
        let (cat_idx, entry_idx) = self.entry_index(category_id, entry_id)?;
        let removed = self.resume.categories[cat_idx].entries.remove(entry_idx);
        info!(category_id = category_id.0, entry_id = entry_id.0, "Entry deleted");
        Ok(removed)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Skills
    // ────────────────────────────────────────────────────────────────────────

    pub fn add_skill(&mut self, name: &str, level: i64) -> Result<SkillId, StoreError> {
        let name = require_name(name, "skill name")?.to_string();
        let level = check_level(level)?;

        let id = SkillId(take_id(&mut self.next_ids.next_skill, "skill")?);
        self.resume.skills.push(Skill { id, name, level });
        info!(skill_id = id.0, level, "Skill added");
        Ok(id)
    }

    pub fn delete_skill(&mut self, id: SkillId) -> Result<Skill, StoreError> {
        let idx = self
            .resume
            .skills
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{id} not found")))?;
        let removed = self.resume.skills.remove(idx);
        info!(skill_id = id.0, "Skill deleted");
        Ok(removed)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Lookup helpers
    // ────────────────────────────────────────────────────────────────────────

    fn category_index(&self, id: CategoryId) -> Result<usize, StoreError> {
        self.resume
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{id} not found")))
    }

    fn entry_index(
        &self,
        category_id: CategoryId,
        entry_id: EntryId,
    ) -> Result<(usize, usize), StoreError> {
        let cat_idx = self.category_index(category_id)?;
        let entry_idx = self.resume.categories[cat_idx]
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("{entry_id} not found in {category_id}"))
            })?;
        Ok((cat_idx, entry_idx))
    }
}

fn require_name<'a>(name: &'a str, field: &str) -> Result<&'a str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

fn check_level(level: i64) -> Result<u8, StoreError> {
    u8::try_from(level)
        .ok()
        .filter(|l| (SKILL_LEVEL_MIN..=SKILL_LEVEL_MAX).contains(l))
        .ok_or_else(|| {
            StoreError::Validation(format!(
                "skill level must be between {SKILL_LEVEL_MIN} and {SKILL_LEVEL_MAX}, got {level}"
            ))
        })
}

/// Hands out the counter's current value and advances it. An exhausted
/// counter is left as it was.
fn take_id(counter: &mut u64, kind: &str) -> Result<u64, StoreError> {
    let id = *counter;
    *counter = id
        .checked_add(1)
        .ok_or_else(|| StoreError::Validation(format!("no {kind} ids left")))?;
    Ok(id)
}

/// Lowest counter value that cannot collide with any of `ids`.
fn counter_floor(ids: impl Iterator<Item = u64>, kind: &str) -> Result<u64, StoreError> {
    let mut floor = 1;
    for id in ids {
        let next = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Validation(format!("{kind} id {id} is out of range")))?;
        floor = floor.max(next);
    }
    Ok(floor)
}

/// Blank optional fields are stored as absent.
fn optional_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
