//! Snapshot → ordered document blocks.
//!
//! The block list fixes what appears in the export and in which order; the
//! paginator decides where it goes. Absent optional fields produce no block.

use chrono::NaiveDate;

use crate::resume::models::{ResumeSnapshot, SKILL_LEVEL_MAX};

pub const FILLED_GLYPH: char = '●';
pub const EMPTY_GLYPH: char = '○';

/// Header shown when no name has been entered.
const NAME_PLACEHOLDER: &str = "Your Name";

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Contact(String),
    Summary(String),
    /// Horizontal rule between sections.
    Separator,
    Heading(String),
    Skill { name: String, filled: u8, empty: u8 },
    EntryName(String),
    EntryDate(String),
    EntryLink(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Goes into the PDF info dictionary, not the page body.
    pub title: String,
    pub blocks: Vec<Block>,
}

pub fn build_document(snapshot: &ResumeSnapshot) -> Document {
    let personal = &snapshot.personal;
    let name = if personal.name.is_empty() {
        NAME_PLACEHOLDER
    } else {
        personal.name.as_str()
    };

    let mut blocks = vec![Block::Title(name.to_string())];

    let dob = (!personal.dob.is_empty()).then(|| format!("DOB: {}", format_date(&personal.dob)));
    let contact: Vec<&str> = [
        personal.email.as_str(),
        personal.phone.as_str(),
        personal.address.as_str(),
        dob.as_deref().unwrap_or(""),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();
    if !contact.is_empty() {
        blocks.push(Block::Contact(contact.join(" | ")));
    }
    if !personal.summary.is_empty() {
        blocks.push(Block::Summary(personal.summary.clone()));
    }

    let mut sections: Vec<Vec<Block>> = Vec::new();

    if !snapshot.skills.is_empty() {
        let mut section = vec![Block::Heading("SKILLS".to_string())];
        section.extend(snapshot.skills.iter().map(|skill| {
            let filled = skill.level.min(SKILL_LEVEL_MAX);
            Block::Skill {
                name: skill.name.clone(),
                filled,
                empty: SKILL_LEVEL_MAX - filled,
            }
        }));
        sections.push(section);
    }

    for category in &snapshot.categories {
        let mut section = vec![Block::Heading(category.name.to_uppercase())];
        for entry in &category.entries {
            section.push(Block::EntryName(entry.name.clone()));
            if let Some(date) = &entry.date {
                section.push(Block::EntryDate(format_date(date)));
            }
            if let Some(link) = &entry.link {
                section.push(Block::EntryLink(link.clone()));
            }
        }
        sections.push(section);
    }

    for (i, section) in sections.into_iter().enumerate() {
        if i > 0 && snapshot.settings.separator {
            blocks.push(Block::Separator);
        }
        blocks.extend(section);
    }

    let title = if personal.name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{} - Resume", personal.name)
    };

    Document { title, blocks }
}

/// Formats an ISO date (`YYYY-MM-DD`, optionally followed by a `T` time part)
/// as `Mon DD, YYYY`. Anything else is returned verbatim.
pub fn format_date(value: &str) -> String {
    let date_part = value.split('T').next().unwrap_or(value);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%b %d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// Renders the document as plain text, one block per line.
pub fn to_plain_text(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.blocks {
        match block {
            Block::Title(text) | Block::Contact(text) | Block::Summary(text) => {
                out.push_str(text);
            }
            Block::Separator => out.push_str(&"-".repeat(40)),
            Block::Heading(text) => {
                out.push('\n');
                out.push_str(text);
            }
            Block::Skill {
                name,
                filled,
                empty,
            } => {
                out.push_str(name);
                out.push(' ');
                out.push_str(&indicator(*filled, *empty));
            }
            Block::EntryName(text) => {
                out.push_str("- ");
                out.push_str(text);
            }
            Block::EntryDate(text) | Block::EntryLink(text) => {
                out.push_str("  ");
                out.push_str(text);
            }
        }
        out.push('\n');
    }
    out
}

/// `filled` filled glyphs followed by `empty` empty ones.
pub fn indicator(filled: u8, empty: u8) -> String {
    std::iter::repeat(FILLED_GLYPH)
        .take(filled as usize)
        .chain(std::iter::repeat(EMPTY_GLYPH).take(empty as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::{NewEntry, PersonalInfoInput, SettingsInput};
    use crate::resume::store::ResumeStore;

    fn sample_store() -> ResumeStore {
        let mut store = ResumeStore::new();
        store.set_personal_info(PersonalInfoInput {
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "+123456789".into(),
            ..Default::default()
        });
        store.add_skill("Python", 4).unwrap();
        store.add_skill("SQL", 3).unwrap();
        let projects = store.add_category("Projects").unwrap();
        store
            .add_entry(
                projects,
                NewEntry {
                    name: "Resume Manager".into(),
                    link: Some("https://github.com/johndoe/resume-manager".into()),
                    date: Some("2025".into()),
                },
            )
            .unwrap();
        let work = store.add_category("Work Experience").unwrap();
        store
            .add_entry(
                work,
                NewEntry {
                    name: "Software Developer @ Company".into(),
                    link: None,
                    date: Some("2022–Present".into()),
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_blocks_follow_resume_order() {
        let doc = build_document(&sample_store().snapshot());
        assert_eq!(
            doc.blocks,
            vec![
                Block::Title("John Doe".into()),
                Block::Contact("john@example.com | +123456789".into()),
                Block::Heading("SKILLS".into()),
                Block::Skill {
                    name: "Python".into(),
                    filled: 4,
                    empty: 1
                },
                Block::Skill {
                    name: "SQL".into(),
                    filled: 3,
                    empty: 2
                },
                Block::Separator,
                Block::Heading("PROJECTS".into()),
                Block::EntryName("Resume Manager".into()),
                Block::EntryDate("2025".into()),
                Block::EntryLink("https://github.com/johndoe/resume-manager".into()),
                Block::Separator,
                Block::Heading("WORK EXPERIENCE".into()),
                Block::EntryName("Software Developer @ Company".into()),
                Block::EntryDate("2022–Present".into()),
            ]
        );
        assert_eq!(doc.title, "John Doe - Resume");
    }

    #[test]
    fn test_skill_indicators_sum_to_max() {
        let mut store = ResumeStore::new();
        for level in 1..=5 {
            store.add_skill(&format!("skill{level}"), level).unwrap();
        }
        let doc = build_document(&store.snapshot());
        let skills: Vec<(u8, u8)> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Skill { filled, empty, .. } => Some((*filled, *empty)),
                _ => None,
            })
            .collect();
        assert_eq!(skills, vec![(1, 4), (2, 3), (3, 2), (4, 1), (5, 0)]);
    }

    #[test]
    fn test_empty_resume_is_title_only() {
        let doc = build_document(&ResumeStore::new().snapshot());
        assert_eq!(doc.blocks, vec![Block::Title("Your Name".into())]);
        assert_eq!(doc.title, "Resume");
    }

    #[test]
    fn test_separator_setting_off() {
        let mut store = sample_store();
        store
            .update_settings(SettingsInput {
                columns: None,
                separator: Some(false),
            })
            .unwrap();
        let doc = build_document(&store.snapshot());
        assert!(!doc.blocks.contains(&Block::Separator));
    }

    #[test]
    fn test_extended_personal_fields_in_header() {
        let mut store = ResumeStore::new();
        store.set_personal_info(PersonalInfoInput {
            name: "Ada".into(),
            phone: "555".into(),
            address: "London".into(),
            dob: "1815-12-10".into(),
            summary: "Analyst.".into(),
            ..Default::default()
        });
        let doc = build_document(&store.snapshot());
        assert_eq!(
            doc.blocks[1],
            Block::Contact("555 | London | DOB: Dec 10, 1815".into())
        );
        assert_eq!(doc.blocks[2], Block::Summary("Analyst.".into()));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05"), "Mar 05, 2024");
        assert_eq!(format_date("2024-03-05T10:00:00"), "Mar 05, 2024");
        assert_eq!(format_date("2022–Present"), "2022–Present");
        assert_eq!(format_date("2025"), "2025");
    }

    #[test]
    fn test_plain_text_has_no_placeholders() {
        let text = to_plain_text(&build_document(&sample_store().snapshot()));
        assert!(text.contains("Python ●●●●○"));
        assert!(text.contains("SQL ●●●○○"));
        assert!(!text.contains("None"));

        let work = text.find("WORK EXPERIENCE").unwrap();
        let projects = text.find("PROJECTS").unwrap();
        let skills = text.find("SKILLS").unwrap();
        assert!(skills < projects && projects < work);
        assert!(!text[work..].contains("http"));
    }

    #[test]
    fn test_indicator() {
        assert_eq!(indicator(4, 1), "●●●●○");
        assert_eq!(indicator(0, 0), "");
    }
}
