use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::dto::workflow_dto::{NotificationQuery, UnreadCountResponse};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::notification::Notification;
use crate::routes::{dispatch, respond};
use crate::services::notification_service::NotificationService;
use crate::services::store_service::Action;
use crate::AppState;

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>> {
    let store = state.store.lock().await;
    Ok(Json(NotificationService::list(store.snapshot(), query.unread_only)))
}

pub async fn unread_count(State(state): State<AppState>) -> Result<Json<UnreadCountResponse>> {
    let store = state.store.lock().await;
    Ok(Json(UnreadCountResponse {
        unread: NotificationService::unread_count(store.snapshot()),
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::MarkNotificationRead(id)).await?))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::MarkAllNotificationsRead).await?))
}
