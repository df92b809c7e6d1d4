use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::event::ScheduledEvent;
use crate::routes::{dispatch, respond};
use crate::services::event_service::EventPayload;
use crate::services::store_service::Action;
use crate::AppState;

/// Earliest first.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<ScheduledEvent>>> {
    let store = state.store.lock().await;
    Ok(Json(store.snapshot().events.clone()))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::AddEvent(payload)).await?))
}

pub async fn update_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse> {
    let action = Action::UpdateEvent {
        event_id: id,
        payload,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::DeleteEvent(id)).await?))
}
