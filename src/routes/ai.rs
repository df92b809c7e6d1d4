use axum::{
    extract::{Multipart, State},
    response::Json,
};
use bytes::Bytes;
use validator::Validate;

use crate::dto::candidate_dto::CreateCandidatePayload;
use crate::dto::maintenance_dto::GenerateEmailPayload;
use crate::error::{Error, Result};
use crate::services::ai_service::{EmailDraft, AI_DISABLED};
use crate::services::intake_service::{prefill_intake, IntakePrefill};
use crate::services::template_service::DEFAULT_JOB_TITLE;
use crate::AppState;

/// Multipart fields: `file` (the CV) and optionally `draft`, the intake form
/// filled in so far as JSON. Always answers 200; a failed extraction is
/// reported in `error` with the draft unchanged.
pub async fn parse_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IntakePrefill>> {
    let mut draft = CreateCandidatePayload::default();
    let mut document: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "draft" => {
                let raw = field.text().await?;
                draft = serde_json::from_str(&raw)?;
            }
            "file" => {
                let filename = field.file_name().unwrap_or("cv").to_string();
                let mime = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                document = Some((filename, mime, data));
            }
            _ => {}
        }
    }

    let (filename, mime, data) =
        document.ok_or_else(|| Error::BadRequest("A CV file is required".to_string()))?;
    // Browsers send this for anything they do not recognise.
    let mime = mime.filter(|m| m != "application/octet-stream");

    let prefill = prefill_intake(
        state.ai.as_deref(),
        draft,
        data.to_vec(),
        mime.as_deref(),
        &filename,
    )
    .await;
    Ok(Json(prefill))
}

pub async fn generate_email(
    State(state): State<AppState>,
    Json(payload): Json<GenerateEmailPayload>,
) -> Result<Json<EmailDraft>> {
    payload.validate()?;
    let ai = state
        .ai
        .as_ref()
        .ok_or_else(|| Error::Ai(AI_DISABLED.to_string()))?;
    let job_title = payload
        .job_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());

    match ai
        .generate_email(payload.candidate_name, job_title, payload.purpose)
        .await
    {
        Ok(draft) => Ok(Json(draft)),
        Err(e) => {
            tracing::warn!("AI email generation failed: {}", e);
            Err(e)
        }
    }
}
