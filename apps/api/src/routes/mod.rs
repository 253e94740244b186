pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume Store
        .route("/api/v1/resume", get(resume::handle_get_resume))
        .route("/api/v1/resume/personal", put(resume::handle_set_personal))
        .route("/api/v1/resume/settings", put(resume::handle_update_settings))
        .route("/api/v1/resume/categories", post(resume::handle_add_category))
        .route(
            "/api/v1/resume/categories/:id",
            delete(resume::handle_delete_category),
        )
        .route(
            "/api/v1/resume/categories/:id/entries",
            post(resume::handle_add_entry),
        )
        .route(
            "/api/v1/resume/categories/:id/entries/:entry_id",
            patch(resume::handle_edit_entry).delete(resume::handle_delete_entry),
        )
        .route("/api/v1/resume/skills", post(resume::handle_add_skill))
        .route("/api/v1/resume/skills/:id", delete(resume::handle_delete_skill))
        // Export
        .route("/api/v1/resume/preview", get(export::handle_preview))
        .route("/api/v1/resume/export", get(export::handle_export))
        .with_state(state)
}
