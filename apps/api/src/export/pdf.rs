//! Laid-out pages → PDF bytes via pdf-writer.
//!
//! Text uses the non-embedded base-14 Helvetica faces with WinAnsiEncoding,
//! so output is small and byte-for-byte reproducible. The only time-dependent
//! value is the optional `CreationDate` in the document info dictionary.

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::export::font_metrics::{FontFace, PageConfig};
use crate::export::paginate::{Color, Item, Page};

/// Bézier control-point distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

const PRODUCER: &str = concat!("resume-api ", env!("CARGO_PKG_VERSION"));

struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Writes `pages` as a PDF document. `title` and `generated_at` only reach
/// the info dictionary.
pub fn render_pdf(
    pages: &[Page],
    title: &str,
    config: &PageConfig,
    generated_at: Option<DateTime<Utc>>,
) -> Vec<u8> {
    let mut alloc = RefAlloc(0);
    let catalog_id = alloc.next();
    let tree_id = alloc.next();
    let regular_id = alloc.next();
    let bold_id = alloc.next();
    let info_id = alloc.next();
    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc.next(), alloc.next())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (face, id) in [(FontFace::Regular, regular_id), (FontFace::Bold, bold_id)] {
        pdf.type1_font(id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let media_box = Rect::new(0.0, 0.0, config.page_width_pt, config.page_height_pt);
    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut page_writer = pdf.page(*page_id);
        page_writer.media_box(media_box);
        page_writer.parent(tree_id);
        page_writer.contents(*content_id);
        page_writer
            .resources()
            .fonts()
            .pair(Name(FontFace::Regular.resource_name()), regular_id)
            .pair(Name(FontFace::Bold.resource_name()), bold_id);
        page_writer.finish();

        pdf.stream(*content_id, &page_content(page));
    }

    let mut info = pdf.document_info(info_id);
    info.title(TextStr(title));
    info.producer(TextStr(PRODUCER));
    if let Some(ts) = generated_at {
        info.creation_date(
            Date::new(ts.year().clamp(0, 9999) as u16)
                .month(ts.month() as u8)
                .day(ts.day() as u8)
                .hour(ts.hour() as u8)
                .minute(ts.minute() as u8)
                .second(ts.second() as u8),
        );
    }
    info.finish();

    pdf.finish()
}

fn page_content(page: &Page) -> Vec<u8> {
    let mut content = Content::new();
    for item in &page.items {
        match item {
            Item::Text {
                x,
                y,
                face,
                size_pt,
                color,
                text,
            } => {
                let (r, g, b) = color.rgb();
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(face.resource_name()), *size_pt);
                content.next_line(*x, *y);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
            Item::Rule { x1, x2, y } => {
                let (r, g, b) = Color::Rule.rgb();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(0.6);
                content.move_to(*x1, *y);
                content.line_to(*x2, *y);
                content.stroke();
            }
            Item::Indicator {
                cx,
                cy,
                radius,
                filled,
            } => {
                circle_path(&mut content, *cx, *cy, *radius);
                if *filled {
                    let (r, g, b) = Color::Ink.rgb();
                    content.set_fill_rgb(r, g, b);
                    content.fill_nonzero();
                } else {
                    let (r, g, b) = Color::Muted.rgb();
                    content.set_stroke_rgb(r, g, b);
                    content.set_line_width(0.8);
                    content.stroke();
                }
            }
        }
    }
    content.finish()
}

fn circle_path(content: &mut Content, cx: f32, cy: f32, r: f32) {
    let k = KAPPA * r;
    content.move_to(cx + r, cy);
    content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    content.close_path();
}

/// Encodes text for a WinAnsiEncoding font. Characters outside the encoding
/// become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}
