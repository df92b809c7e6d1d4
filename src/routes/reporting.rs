use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use crate::dto::maintenance_dto::ReportQuery;
use crate::error::Result;
use crate::services::export_service::ExportService;
use crate::services::report_service::{build_report, Report};
use crate::utils::time::now;
use crate::AppState;

pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>> {
    let store = state.store.lock().await;
    Ok(Json(build_report(&store.snapshot().candidates, query.range, now())))
}

/// Report period's candidates as a styled XLSX workbook.
pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let at = now();
    let candidates = state.store.lock().await.snapshot().candidates.clone();
    let buffer = ExportService::generate_report_xlsx(&candidates, query.range, at)?;
    let filename = format!("recruitment_report_{}.xlsx", at.format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
