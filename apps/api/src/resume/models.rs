use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted skill proficiency.
pub const SKILL_LEVEL_MIN: u8 = 1;
/// Highest accepted skill proficiency; also the number of indicators rendered per skill.
pub const SKILL_LEVEL_MAX: u8 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────────────────────────────────────

macro_rules! id_type {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }
    };
}

id_type!(CategoryId, "Category");
id_type!(EntryId, "Entry");
id_type!(SkillId, "Skill");

/// Next identifier to hand out per entity type. Counters only move forward,
/// so an id freed by a delete is never issued again within the same resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub next_category: u64,
    pub next_entry: u64,
    pub next_skill: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            next_category: 1,
            next_entry: 1,
            next_skill: 1,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Date of birth, `YYYY-MM-DD` when entered through the date picker.
    pub dob: String,
    pub summary: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub link: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub level: u8,
}

/// Column count for the exported layout. Serialized as the plain number 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Columns {
    One,
    #[default]
    Two,
}

impl Columns {
    pub fn count(self) -> usize {
        match self {
            Columns::One => 1,
            Columns::Two => 2,
        }
    }
}

impl TryFrom<u8> for Columns {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Columns::One),
            2 => Ok(Columns::Two),
            other => Err(format!("columns must be 1 or 2, got {other}")),
        }
    }
}

impl From<Columns> for u8 {
    fn from(columns: Columns) -> Self {
        columns.count() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: Columns,
    /// Draw a horizontal rule between sections.
    pub separator: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: Columns::Two,
            separator: true,
        }
    }
}

/// Aggregate root: personal info, categories with their entries, skills, settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub personal: PersonalInfo,
    pub categories: Vec<Category>,
    pub skills: Vec<Skill>,
    pub settings: Settings,
}

/// Immutable point-in-time copy of the aggregate handed to readers and the exporter.
pub type ResumeSnapshot = Resume;

/// Persistence form of the store: the aggregate plus its id counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(flatten)]
    pub resume: Resume,
    #[serde(default)]
    pub next_ids: IdCounters,
}

// ────────────────────────────────────────────────────────────────────────────
// Operation inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonalInfoInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub dob: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEntry {
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Partial update for an entry. `None` leaves a field untouched; an empty
/// `link` or `date` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntryPatch {
    pub name: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsInput {
    pub columns: Option<i64>,
    pub separator: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_serialize_as_number() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(json, r#"{"columns":2,"separator":true}"#);
    }

    #[test]
    fn test_columns_reject_out_of_range() {
        let parsed: Result<Settings, _> = serde_json::from_str(r#"{"columns":3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_record_flattens_resume_fields() {
        let record: ResumeRecord = serde_json::from_str(
            r#"{"personal":{"name":"Ada"},"categories":[],"skills":[]}"#,
        )
        .unwrap();
        assert_eq!(record.resume.personal.name, "Ada");
        assert_eq!(record.resume.settings, Settings::default());
        assert_eq!(record.next_ids, IdCounters::default());
    }

    #[test]
    fn test_id_display_names_entity() {
        assert_eq!(CategoryId(3).to_string(), "Category 3");
        assert_eq!(SkillId(12).to_string(), "Skill 12");
    }
}
