use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::candidate_dto::{
    AvatarPayload, BulkMessagePayload, BulkNotePayload, BulkStatusPayload,
    CandidateDetailResponse, CandidateListQuery, CreateCandidatePayload, KitPayload,
    MergePayload, NotePayload, UpdateCandidatePayload,
};
use crate::dto::maintenance_dto::DuplicateGroupsResponse;
use crate::dto::workflow_dto::TerminationEmailPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::candidate::{Candidate, ScreeningRatings};
use crate::routes::{dispatch, respond};
use crate::services::candidate_service::CandidateService;
use crate::services::lifecycle_service::StatusChange;
use crate::services::store_service::Action;
use crate::services::template_service::TemplateService;
use crate::utils::time::now;
use crate::AppState;

pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<Json<Vec<Candidate>>> {
    let store = state.store.lock().await;
    let candidates = store
        .snapshot()
        .candidates
        .iter()
        .filter(|c| query.matches(c))
        .cloned()
        .collect();
    Ok(Json(candidates))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateDetailResponse>> {
    let store = state.store.lock().await;
    let snapshot = store.snapshot();
    let candidate = snapshot
        .candidate(id)
        .cloned()
        .ok_or_else(|| Error::not_found("Candidate", id))?;
    Ok(Json(CandidateDetailResponse {
        candidate,
        tasks: snapshot
            .tasks
            .iter()
            .filter(|t| t.candidate_id == Some(id))
            .cloned()
            .collect(),
        events: snapshot
            .events
            .iter()
            .filter(|e| e.candidate_id == id)
            .cloned()
            .collect(),
        pipeline_entry: snapshot.pipeline_entry(id).cloned(),
    }))
}

pub async fn create_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = dispatch(&state, &claims, Action::AddCandidate(payload)).await?;
    Ok(respond(outcome))
}

pub async fn update_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let action = Action::UpdateCandidate {
        candidate_id: id,
        details: payload,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange>,
) -> Result<impl IntoResponse> {
    let action = Action::ChangeStatus {
        candidate_id: id,
        change,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn bulk_change_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BulkStatusPayload>,
) -> Result<impl IntoResponse> {
    let action = Action::BulkChangeStatus {
        candidate_ids: payload.candidate_ids,
        change: payload.change,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AvatarPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let action = Action::UpdateAvatar {
        candidate_id: id,
        avatar_url: payload.avatar_url,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn add_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NotePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let action = Action::AddNote {
        candidate_id: id,
        content: payload.content,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn bulk_add_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BulkNotePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let action = Action::BulkAddNote {
        candidate_ids: payload.candidate_ids,
        content: payload.content,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn bulk_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BulkMessagePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let action = Action::BulkMessage {
        candidate_ids: payload.candidate_ids,
        subject: payload.subject,
        body: payload.body,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn rate_candidate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(ratings): Json<ScreeningRatings>,
) -> Result<impl IntoResponse> {
    let action = Action::RateCandidate {
        candidate_id: id,
        ratings,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn mark_cost_paid(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, cost_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let action = Action::MarkCostPaid {
        candidate_id: id,
        cost_id,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn update_kit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<KitPayload>,
) -> Result<impl IntoResponse> {
    let action = Action::UpdateKit {
        candidate_id: id,
        items: payload.items,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn mark_kit_returned(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let action = Action::MarkKitReturned {
        candidate_id: id,
        item_id,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn merge_candidates(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<MergePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let action = Action::MergeCandidates {
        master_id: payload.master_id,
        duplicate_ids: payload.duplicate_ids,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn list_duplicates(
    State(state): State<AppState>,
) -> Result<Json<DuplicateGroupsResponse>> {
    let store = state.store.lock().await;
    Ok(Json(DuplicateGroupsResponse {
        groups: CandidateService::duplicate_groups(store.snapshot()),
    }))
}

/// Drafts the termination email once a reason is known. 204 when no
/// "Termination" template exists.
pub async fn termination_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TerminationEmailPayload>,
) -> Result<Response> {
    let store = state.store.lock().await;
    let rendered =
        TemplateService::termination_email(store.snapshot(), id, &payload.reason, now())?;
    Ok(match rendered {
        Some(message) => Json(message).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

pub async fn render_template(
    State(state): State<AppState>,
    Path((id, template_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let store = state.store.lock().await;
    let rendered =
        TemplateService::render_for_candidate(store.snapshot(), template_id, id, now())?;
    Ok(Json(rendered))
}
