//! Pre-fills an uncommitted intake draft from an uploaded CV.
//!
//! Nothing here touches the snapshot. A failed extraction hands the draft back
//! untouched along with a message for the recruiter.

use serde::Serialize;

use crate::dto::candidate_dto::CreateCandidatePayload;
use crate::error::Error;
use crate::services::ai_service::{AiAssistant, CvExtraction};

pub const UNKNOWN_TYPE: &str = "Could not determine file type. Please upload a PDF.";
pub const WORD_DOCUMENT: &str = "Word documents cannot be auto-parsed by AI. Please save as PDF and re-upload, or fill details manually.";
pub const GENERIC_FAILURE: &str = "Could not automatically parse CV. Please fill in the details manually.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakePrefill {
    pub draft: CreateCandidatePayload,
    pub error: Option<String>,
}

/// The declared content type, or one guessed from the file extension.
pub fn resolve_mime(declared: Option<&str>, filename: &str) -> Option<String> {
    if let Some(mime) = declared.map(str::trim).filter(|m| !m.is_empty()) {
        return Some(mime.to_string());
    }
    let extension = filename.rsplit_once('.')?.1.to_lowercase();
    let mime = match extension.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime.to_string())
}

fn is_word_document(mime: &str) -> bool {
    mime.contains("word") || mime.contains("officedocument")
}

fn or_keep(found: String, current: String) -> String {
    if found.trim().is_empty() {
        current
    } else {
        found.trim().to_string()
    }
}

/// Address keeps its first comma segment; the postcode is taken from the last.
pub fn merge_extraction(
    mut draft: CreateCandidatePayload,
    extraction: CvExtraction,
) -> CreateCandidatePayload {
    draft.name = or_keep(extraction.name, draft.name);
    draft.email = or_keep(extraction.email, draft.email);
    draft.phone = or_keep(extraction.phone, draft.phone);
    if !extraction.address.trim().is_empty() {
        let segments: Vec<&str> = extraction.address.split(',').map(str::trim).collect();
        draft.address = segments.first().copied().unwrap_or_default().to_string();
        draft.postcode = segments.last().copied().unwrap_or_default().to_string();
    }
    if !extraction.skills.is_empty() && !extraction.synopsis.trim().is_empty() {
        draft.key_skills = extraction.skills;
        draft.work_history_summary = Some(extraction.synopsis);
    }
    draft
}

/// One extraction attempt per upload; errors degrade to manual entry.
pub async fn prefill_intake(
    ai: Option<&dyn AiAssistant>,
    mut draft: CreateCandidatePayload,
    document: Vec<u8>,
    declared_mime: Option<&str>,
    filename: &str,
) -> IntakePrefill {
    draft.cv_filename = Some(filename.to_string());

    let failure = |draft: CreateCandidatePayload, message: String| {
        tracing::warn!(filename, "CV prefill skipped: {}", message);
        IntakePrefill {
            draft,
            error: Some(message),
        }
    };

    let Some(mime) = resolve_mime(declared_mime, filename) else {
        return failure(draft, UNKNOWN_TYPE.to_string());
    };
    if is_word_document(&mime) {
        return failure(draft, WORD_DOCUMENT.to_string());
    }
    let Some(ai) = ai else {
        return failure(draft, crate::services::ai_service::AI_DISABLED.to_string());
    };

    match ai.parse_cv(document, mime).await {
        Ok(extraction) => IntakePrefill {
            draft: merge_extraction(draft, extraction),
            error: None,
        },
        Err(Error::Ai(message)) => failure(draft, message),
        Err(other) => {
            tracing::error!("CV parsing failed unexpectedly: {:?}", other);
            failure(draft, GENERIC_FAILURE.to_string())
        }
    }
}
