use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::pipeline::TalentPipelineEntry;
use crate::routes::{dispatch, respond};
use crate::services::pipeline_service::PipelineRequest;
use crate::services::store_service::Action;
use crate::AppState;

/// Entries ordered by follow-up date, soonest first.
pub async fn list_pipeline(
    State(state): State<AppState>,
) -> Result<Json<Vec<TalentPipelineEntry>>> {
    let store = state.store.lock().await;
    let mut entries = store.snapshot().talent_pipeline.clone();
    entries.sort_by_key(|e| e.follow_up_on);
    Ok(Json(entries))
}

pub async fn add_to_pipeline(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PipelineRequest>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::AddToPipeline(payload)).await?))
}

pub async fn process_entry(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let action = Action::ProcessPipelineCandidate(candidate_id);
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn snooze_entry(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(candidate_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let action = Action::SnoozePipelineEntry(candidate_id);
    Ok(respond(dispatch(&state, &claims, action).await?))
}
