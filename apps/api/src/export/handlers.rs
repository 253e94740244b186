use anyhow::Context;
use axum::{extract::State, http::header, response::IntoResponse};
use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::export::{build_document, render, to_plain_text, RenderOptions};
use crate::state::AppState;

/// GET /api/v1/resume/preview
/// Plain-text rendering of the same document the PDF export lays out.
pub async fn handle_preview(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.read().await.snapshot();
    let text = to_plain_text(&build_document(&snapshot));
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}

/// GET /api/v1/resume/export
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // Snapshot under the read lock; rendering runs after it is released.
    let snapshot = state.store.read().await.snapshot();
    let options = RenderOptions {
        page: state.page_config.clone(),
        generated_at: state.config.export_timestamp.then(Utc::now),
    };

    let pdf = tokio::task::spawn_blocking(move || render(&snapshot, &options))
        .await
        .context("PDF render task failed")?;
    info!(bytes = pdf.len(), "Resume exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"resume.pdf\""),
        ],
        Bytes::from(pdf),
    ))
}
