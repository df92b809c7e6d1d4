use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::dto::workflow_dto::{TaskListQuery, TaskStatusPayload};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::task::{Task, TaskStatus};
use crate::routes::{dispatch, respond};
use crate::services::store_service::Action;
use crate::services::task_service::NewTask;
use crate::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>> {
    let store = state.store.lock().await;
    let tasks = store
        .snapshot()
        .tasks
        .iter()
        .filter(|t| query.include_archived || t.status != TaskStatus::Archived)
        .filter(|t| query.candidate_id.map_or(true, |id| t.candidate_id == Some(id)))
        .cloned()
        .collect();
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewTask>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::AddTask(payload)).await?))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskStatusPayload>,
) -> Result<impl IntoResponse> {
    let action = Action::UpdateTaskStatus {
        task_id: id,
        status: payload.status,
    };
    Ok(respond(dispatch(&state, &claims, action).await?))
}

pub async fn archive_completed(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::ArchiveCompletedTasks).await?))
}

pub async fn restore_task(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(respond(dispatch(&state, &claims, Action::RestoreTask(id)).await?))
}
