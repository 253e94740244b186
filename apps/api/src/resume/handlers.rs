use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::models::{
    CategoryId, Entry, EntryId, EntryPatch, NewEntry, PersonalInfo, PersonalInfoInput, Resume,
    Settings, SettingsInput, SkillId,
};
use crate::resume::store::ResumeStore;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct SkillRequest {
    pub name: String,
    pub level: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: u64,
}

/// Writes the current record through the repository. Called with the write
/// lock still held so records reach storage in mutation order.
async fn persist(state: &AppState, store: &ResumeStore) -> Result<(), AppError> {
    state.repository.save(&store.to_record()).await?;
    Ok(())
}

fn created(id: u64) -> (StatusCode, Json<CreatedResponse>) {
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Resume> {
    Json(state.store.read().await.snapshot())
}

/// PUT /api/v1/resume/personal
pub async fn handle_set_personal(
    State(state): State<AppState>,
    Json(req): Json<PersonalInfoInput>,
) -> Result<Json<PersonalInfo>, AppError> {
    let mut store = state.store.write().await;
    let personal = store.set_personal_info(req);
    persist(&state, &store).await?;
    Ok(Json(personal))
}

/// PUT /api/v1/resume/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsInput>,
) -> Result<Json<Settings>, AppError> {
    let mut store = state.store.write().await;
    let settings = store.update_settings(req)?;
    persist(&state, &store).await?;
    Ok(Json(settings))
}

// ────────────────────────────────────────────────────────────────────────────
// Categories & entries
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/categories
pub async fn handle_add_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let mut store = state.store.write().await;
    let id = store.add_category(&req.name)?;
    persist(&state, &store).await?;
    Ok(created(id.0))
}

/// DELETE /api/v1/resume/categories/:id
pub async fn handle_delete_category(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.write().await;
    store.delete_category(CategoryId(id))?;
    persist(&state, &store).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resume/categories/:id/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<NewEntry>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let mut store = state.store.write().await;
    let entry_id = store.add_entry(CategoryId(id), req)?;
    persist(&state, &store).await?;
    Ok(created(entry_id.0))
}

/// PATCH /api/v1/resume/categories/:id/entries/:entry_id
pub async fn handle_edit_entry(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(u64, u64)>,
    Json(req): Json<EntryPatch>,
) -> Result<Json<Entry>, AppError> {
    let mut store = state.store.write().await;
    let entry = store.edit_entry(CategoryId(id), EntryId(entry_id), req)?;
    persist(&state, &store).await?;
    Ok(Json(entry))
}

/// DELETE /api/v1/resume/categories/:id/entries/:entry_id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(u64, u64)>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.write().await;
    store.delete_entry(CategoryId(id), EntryId(entry_id))?;
    persist(&state, &store).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<SkillRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let mut store = state.store.write().await;
    let id = store.add_skill(&req.name, req.level)?;
    persist(&state, &store).await?;
    Ok(created(id.0))
}

/// DELETE /api/v1/resume/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.write().await;
    store.delete_skill(SkillId(id))?;
    persist(&state, &store).await?;
    Ok(StatusCode::NO_CONTENT)
}
