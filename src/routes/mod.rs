pub mod ai;
pub mod auth;
pub mod candidates;
pub mod diary;
pub mod health;
pub mod maintenance;
pub mod notifications;
pub mod pipeline;
pub mod reporting;
pub mod tasks;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::Json,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::middleware::auth::{require_bearer_auth, Claims};
use crate::middleware::cors::permissive_cors;
use crate::services::store_service::{Action, ActionOutcome};
use crate::utils::time::now;
use crate::AppState;

/// Runs one action against the shared store on behalf of the token holder.
pub(crate) async fn dispatch(
    state: &AppState,
    claims: &Claims,
    action: Action,
) -> Result<ActionOutcome> {
    let mut store = state.store.lock().await;
    store.dispatch(action, &claims.sub, now()).await
}

pub(crate) fn respond(outcome: ActionOutcome) -> (StatusCode, Json<ActionOutcome>) {
    let status = match outcome {
        ActionOutcome::Created { .. } => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    (status, Json(outcome))
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route("/api/candidates/duplicates", get(candidates::list_duplicates))
        .route("/api/candidates/merge", post(candidates::merge_candidates))
        .route("/api/candidates/bulk/status", post(candidates::bulk_change_status))
        .route("/api/candidates/bulk/notes", post(candidates::bulk_add_note))
        .route("/api/candidates/bulk/message", post(candidates::bulk_message))
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate).patch(candidates::update_candidate),
        )
        .route("/api/candidates/:id/status", post(candidates::change_status))
        .route("/api/candidates/:id/avatar", put(candidates::update_avatar))
        .route("/api/candidates/:id/notes", post(candidates::add_note))
        .route("/api/candidates/:id/ratings", put(candidates::rate_candidate))
        .route(
            "/api/candidates/:id/costs/:cost_id/pay",
            post(candidates::mark_cost_paid),
        )
        .route("/api/candidates/:id/kit", put(candidates::update_kit))
        .route(
            "/api/candidates/:id/kit/:item_id/return",
            post(candidates::mark_kit_returned),
        )
        .route(
            "/api/candidates/:id/termination-email",
            post(candidates::termination_email),
        )
        .route(
            "/api/candidates/:id/templates/:template_id/render",
            get(candidates::render_template),
        )
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/archive-completed", post(tasks::archive_completed))
        .route("/api/tasks/:id/status", patch(tasks::update_task_status))
        .route("/api/tasks/:id/restore", post(tasks::restore_task))
        .route("/api/events", get(diary::list_events).post(diary::create_event))
        .route(
            "/api/events/:id",
            put(diary::update_event).delete(diary::delete_event),
        )
        .route(
            "/api/pipeline",
            get(pipeline::list_pipeline).post(pipeline::add_to_pipeline),
        )
        .route("/api/pipeline/:candidate_id/process", post(pipeline::process_entry))
        .route("/api/pipeline/:candidate_id/snooze", post(pipeline::snooze_entry))
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/unread-count", get(notifications::unread_count))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .route(
            "/api/settings/costs",
            get(maintenance::get_cost_settings).put(maintenance::update_cost_settings),
        )
        .route(
            "/api/templates",
            get(maintenance::list_templates).post(maintenance::create_template),
        )
        .route(
            "/api/templates/:id",
            put(maintenance::update_template).delete(maintenance::delete_template),
        )
        .route("/api/import/preview", post(maintenance::import_preview))
        .route("/api/import/commit", post(maintenance::import_commit))
        .route("/api/backup", get(maintenance::export_backup))
        .route("/api/backup/restore", post(maintenance::restore_backup))
        .route("/api/reports", get(reporting::get_report))
        .route("/api/reports/export", get(reporting::export_report))
        .route("/api/ai/parse-cv", post(ai::parse_cv))
        .route("/api/ai/generate-email", post(ai::generate_email))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
}
