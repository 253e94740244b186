// Export Transformer: snapshot → document blocks → laid-out pages → PDF bytes.
// Pure and deterministic; rendering is CPU-bound and runs inside
// tokio::task::spawn_blocking when called from a handler.

pub mod document;
pub mod font_metrics;
pub mod handlers;
pub mod paginate;
pub mod pdf;

use chrono::{DateTime, Utc};

pub use document::{build_document, to_plain_text};
pub use font_metrics::{default_page_config, PageConfig};
pub use paginate::paginate;

use crate::resume::models::ResumeSnapshot;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub page: PageConfig,
    /// Written to the PDF info dictionary only. `None` keeps output reproducible.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page: default_page_config(),
            generated_at: None,
        }
    }
}

/// Renders a snapshot to PDF bytes. An empty resume still yields a valid
/// single-page document.
pub fn render(snapshot: &ResumeSnapshot, options: &RenderOptions) -> Vec<u8> {
    let doc = build_document(snapshot);
    let pages = paginate(&doc, &options.page, snapshot.settings.columns);
    pdf::render_pdf(&pages, &doc.title, &options.page, options.generated_at)
}
