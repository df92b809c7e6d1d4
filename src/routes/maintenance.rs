use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::dto::maintenance_dto::ImportCommitPayload;
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::cost::CostSettings;
use crate::models::snapshot::BackupDocument;
use crate::models::template::Template;
use crate::routes::{dispatch, respond};
use crate::services::import_service::{self, CsvTriage};
use crate::services::store_service::Action;
use crate::services::template_service::TemplatePayload;
use crate::utils::time::now;
use crate::AppState;

pub async fn get_cost_settings(State(state): State<AppState>) -> Result<Json<CostSettings>> {
    let store = state.store.lock().await;
    Ok(Json(store.snapshot().cost_settings.clone()))
}

pub async fn update_cost_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(settings): Json<CostSettings>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::UpdateCostSettings(settings)).await?))
}

pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<Template>>> {
    let store = state.store.lock().await;
    Ok(Json(store.snapshot().templates.clone()))
}

pub async fn create_template(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TemplatePayload>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::AddTemplate(payload)).await?))
}

pub async fn update_template(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TemplatePayload>,
) -> Result<impl IntoResponse> {
    let action = Action::UpdateTemplate {
        template_id: id,
        payload,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::DeleteTemplate(id)).await?))
}

/// Sorts an uploaded CSV into new, duplicate and invalid rows. Nothing is saved.
pub async fn import_preview(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CsvTriage>> {
    let store = state.store.lock().await;
    let triage = import_service::triage(&body, &store.snapshot().candidates, now())?;
    Ok(Json(triage))
}

pub async fn import_commit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ImportCommitPayload>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::AddCandidates(payload.candidates)).await?))
}

pub async fn export_backup(State(state): State<AppState>) -> Result<Json<BackupDocument>> {
    let store = state.store.lock().await;
    Ok(Json(store.export_backup()))
}

pub async fn restore_backup(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(backup): Json<BackupDocument>,
) -> Result<impl IntoResponse> {
    tracing::info!(
        candidates = backup.candidates.len(),
        user = %claims.sub,
        "restoring backup"
    );
    Ok(respond(dispatch(&state, &claims, Action::RestoreBackup(backup)).await?))
}
