//! Pagination: flows document blocks through column frames onto pages.
//!
//! Each block becomes one or more rows (wrapped lines, a rule, a skill row).
//! Rows are placed top to bottom in the current frame; when a row does not
//! fit, placement moves to the next column, then to a fresh page. Nothing is
//! dropped or reordered.
//!
//! # Frame rules
//! - Vertical space before a row is skipped at the top of a frame.
//! - A heading is kept together with the row that follows it.
//! - A row taller than an empty frame is placed anyway.

use crate::export::document::{Block, Document};
use crate::export::font_metrics::{get_metrics, FontFace, PageConfig};
use crate::resume::models::{Columns, SKILL_LEVEL_MAX};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Ink,
    Muted,
    Link,
    Rule,
}

impl Color {
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            Color::Ink => (0.07, 0.09, 0.15),
            Color::Muted => (0.22, 0.25, 0.32),
            Color::Link => (0.10, 0.45, 0.91),
            Color::Rule => (0.90, 0.90, 0.90),
        }
    }
}

/// A positioned drawing instruction. Coordinates are PDF points from the
/// bottom-left page corner; text `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size_pt: f32,
        color: Color,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
    Indicator {
        cx: f32,
        cy: f32,
        radius: f32,
        filled: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

const RULE_HEIGHT: f32 = 6.0;
/// Horizontal distance between indicator centres, as a multiple of body size.
const INDICATOR_PITCH: f32 = 0.9;

#[derive(Debug, Clone)]
enum RowContent {
    Text {
        face: FontFace,
        size_pt: f32,
        color: Color,
        text: String,
    },
    Rule,
    Skill {
        name: String,
        filled: u8,
        empty: u8,
    },
}

#[derive(Debug, Clone)]
struct Row {
    space_before: f32,
    height: f32,
    keep_with_next: bool,
    content: RowContent,
}

fn text_rows(
    text: &str,
    face: FontFace,
    size_pt: f32,
    color: Color,
    space_before: f32,
    width: f32,
    config: &PageConfig,
) -> Vec<Row> {
    get_metrics(face)
        .wrap(text, size_pt, width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| Row {
            space_before: if i == 0 { space_before } else { 0.0 },
            height: size_pt * config.leading,
            keep_with_next: false,
            content: RowContent::Text {
                face,
                size_pt,
                color,
                text: line,
            },
        })
        .collect()
}

fn indicator_strip_width(config: &PageConfig) -> f32 {
    f32::from(SKILL_LEVEL_MAX) * INDICATOR_PITCH * config.body_size_pt
}

fn block_rows(block: &Block, width: f32, config: &PageConfig) -> Vec<Row> {
    let body = config.body_size_pt;
    match block {
        Block::Title(text) => text_rows(
            text,
            FontFace::Bold,
            config.title_size_pt,
            Color::Ink,
            0.0,
            width,
            config,
        ),
        Block::Contact(text) => {
            text_rows(text, FontFace::Regular, body, Color::Muted, 2.0, width, config)
        }
        Block::Summary(text) => {
            text_rows(text, FontFace::Regular, body, Color::Ink, 4.0, width, config)
        }
        Block::Separator => vec![Row {
            space_before: 4.0,
            height: RULE_HEIGHT,
            keep_with_next: false,
            content: RowContent::Rule,
        }],
        Block::Heading(text) => {
            let mut rows = text_rows(
                text,
                FontFace::Bold,
                config.heading_size_pt,
                Color::Ink,
                8.0,
                width,
                config,
            );
            for row in &mut rows {
                row.keep_with_next = true;
            }
            rows
        }
        Block::Skill {
            name,
            filled,
            empty,
        } => {
            let name_width = width - indicator_strip_width(config) - body * 0.5;
            let mut lines = get_metrics(FontFace::Regular).wrap(name, body, name_width);
            if lines.is_empty() {
                lines.push(String::new());
            }
            let mut rows = Vec::with_capacity(lines.len());
            for (i, line) in lines.into_iter().enumerate() {
                let content = if i == 0 {
                    RowContent::Skill {
                        name: line,
                        filled: *filled,
                        empty: *empty,
                    }
                } else {
                    RowContent::Text {
                        face: FontFace::Regular,
                        size_pt: body,
                        color: Color::Ink,
                        text: line,
                    }
                };
                rows.push(Row {
                    space_before: if i == 0 { 2.0 } else { 0.0 },
                    height: body * config.leading,
                    keep_with_next: false,
                    content,
                });
            }
            rows
        }
        Block::EntryName(text) => {
            text_rows(text, FontFace::Bold, body, Color::Ink, 4.0, width, config)
        }
        Block::EntryDate(text) => {
            text_rows(text, FontFace::Regular, body, Color::Muted, 0.0, width, config)
        }
        Block::EntryLink(text) => {
            text_rows(text, FontFace::Regular, body, Color::Link, 0.0, width, config)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

struct Cursor {
    column: usize,
    /// Top of the remaining free space in the current frame.
    y: f32,
    frame_empty: bool,
}

/// Lays the document out on as many pages as it needs. Always returns at
/// least one page.
pub fn paginate(doc: &Document, config: &PageConfig, columns: Columns) -> Vec<Page> {
    let width = config.column_width(columns);
    let rows: Vec<Row> = doc
        .blocks
        .iter()
        .flat_map(|block| block_rows(block, width, config))
        .collect();

    let mut pages = Vec::new();
    let mut page = Page::default();
    let mut cursor = Cursor {
        column: 0,
        y: config.top_y(),
        frame_empty: true,
    };

    for (i, row) in rows.iter().enumerate() {
        let mut needed = space_needed(row, cursor.frame_empty);
        if row.keep_with_next {
            if let Some(next) = rows.get(i + 1) {
                needed += space_needed(next, false);
            }
        }

        if !cursor.frame_empty && cursor.y - needed < config.bottom_y() {
            cursor.column += 1;
            if cursor.column >= columns.count() {
                cursor.column = 0;
                pages.push(std::mem::take(&mut page));
            }
            cursor.y = config.top_y();
            cursor.frame_empty = true;
        }

        let top = cursor.y - space_needed(row, cursor.frame_empty) + row.height;
        let x = config.column_x(columns, cursor.column);
        place_row(row, x, top, width, config, &mut page.items);

        cursor.y = top - row.height;
        cursor.frame_empty = false;
    }

    pages.push(page);
    pages
}

fn space_needed(row: &Row, at_frame_top: bool) -> f32 {
    if at_frame_top {
        row.height
    } else {
        row.space_before + row.height
    }
}

fn place_row(row: &Row, x: f32, top: f32, width: f32, config: &PageConfig, out: &mut Vec<Item>) {
    match &row.content {
        RowContent::Text {
            face,
            size_pt,
            color,
            text,
        } => out.push(Item::Text {
            x,
            y: top - size_pt,
            face: *face,
            size_pt: *size_pt,
            color: *color,
            text: text.clone(),
        }),
        RowContent::Rule => out.push(Item::Rule {
            x1: x,
            x2: x + width,
            y: top - row.height / 2.0,
        }),
        RowContent::Skill {
            name,
            filled,
            empty,
        } => {
            let body = config.body_size_pt;
            let baseline = top - body;
            out.push(Item::Text {
                x,
                y: baseline,
                face: FontFace::Regular,
                size_pt: body,
                color: Color::Ink,
                text: name.clone(),
            });

            let pitch = INDICATOR_PITCH * body;
            let radius = body * 0.3;
            let start = x + width - indicator_strip_width(config) + pitch / 2.0;
            let cy = baseline + body * 0.35;
            let total = usize::from(*filled) + usize::from(*empty);
            for i in 0..total {
                out.push(Item::Indicator {
                    cx: start + i as f32 * pitch,
                    cy,
                    radius,
                    filled: i < usize::from(*filled),
                });
            }
        }
    }
}
