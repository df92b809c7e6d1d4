use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::TerminationReason;
use crate::models::snapshot::AppSnapshot;
use crate::models::template::{Template, TemplateType, TERMINATION_TEMPLATE};
use crate::utils::time::uk_date;

pub const DEFAULT_JOB_TITLE: &str = "Trade Plate Driver";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub content: String,
    #[serde(default)]
    pub subject: Option<String>,
}

/// A template with its placeholders filled in, ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub to: String,
    pub subject: String,
    pub content: String,
}

/// Values substituted into `{candidateName}`, `{jobTitle}`, `{currentDate}`
/// and `{terminationReason}`.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub candidate_name: &'a str,
    pub job_title: &'a str,
    pub now: DateTime<Utc>,
    pub termination_reason: Option<&'a str>,
}

pub struct TemplateService;

impl TemplateService {
    pub fn render_text(text: &str, ctx: &RenderContext<'_>) -> String {
        let mut out = text
            .replace("{candidateName}", ctx.candidate_name)
            .replace("{jobTitle}", ctx.job_title)
            .replace("{currentDate}", &uk_date(ctx.now));
        if let Some(reason) = ctx.termination_reason {
            out = out.replace("{terminationReason}", reason);
        }
        out
    }

    pub fn render(template: &Template, to: &str, ctx: &RenderContext<'_>) -> RenderedMessage {
        RenderedMessage {
            to: to.to_string(),
            subject: template
                .subject
                .as_deref()
                .map(|s| Self::render_text(s, ctx))
                .unwrap_or_default(),
            content: Self::render_text(&template.content, ctx),
        }
    }

    /// Second half of the termination protocol: the reason has been collected,
    /// so the termination email can be drafted. `None` when no "Termination"
    /// template exists.
    pub fn termination_email(
        snapshot: &AppSnapshot,
        candidate_id: Uuid,
        reason: &TerminationReason,
        now: DateTime<Utc>,
    ) -> Result<Option<RenderedMessage>> {
        if reason.is_blank() {
            return Err(Error::rejected("Please provide a reason for termination."));
        }
        let candidate = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let Some(template) = snapshot
            .templates
            .iter()
            .find(|t| t.name == TERMINATION_TEMPLATE)
        else {
            return Ok(None);
        };

        let reason = reason.to_string();
        let ctx = RenderContext {
            candidate_name: &candidate.name,
            job_title: DEFAULT_JOB_TITLE,
            now,
            termination_reason: Some(&reason),
        };
        Ok(Some(Self::render(template, &candidate.email, &ctx)))
    }

    pub fn render_for_candidate(
        snapshot: &AppSnapshot,
        template_id: Uuid,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RenderedMessage> {
        let template = snapshot
            .templates
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| Error::not_found("Template", template_id))?;
        let candidate = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let ctx = RenderContext {
            candidate_name: &candidate.name,
            job_title: DEFAULT_JOB_TITLE,
            now,
            termination_reason: None,
        };
        Ok(Self::render(template, &candidate.email, &ctx))
    }

    fn build(id: Uuid, payload: TemplatePayload) -> Result<Template> {
        if payload.name.trim().is_empty() || payload.content.trim().is_empty() {
            return Err(Error::BadRequest(
                "Template name and content are required".to_string(),
            ));
        }
        Ok(Template {
            id,
            name: payload.name.trim().to_string(),
            template_type: payload.template_type,
            content: payload.content,
            subject: payload.subject.filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn add(snapshot: &mut AppSnapshot, payload: TemplatePayload) -> Result<Uuid> {
        let template = Self::build(Uuid::new_v4(), payload)?;
        let id = template.id;
        snapshot.templates.push(template);
        Ok(id)
    }

    pub fn update(
        snapshot: &mut AppSnapshot,
        template_id: Uuid,
        payload: TemplatePayload,
    ) -> Result<()> {
        let updated = Self::build(template_id, payload)?;
        let slot = snapshot
            .templates
            .iter_mut()
            .find(|t| t.id == template_id)
            .ok_or_else(|| Error::not_found("Template", template_id))?;
        *slot = updated;
        Ok(())
    }

    pub fn delete(snapshot: &mut AppSnapshot, template_id: Uuid) -> Result<()> {
        let before = snapshot.templates.len();
        snapshot.templates.retain(|t| t.id != template_id);
        if snapshot.templates.len() == before {
            return Err(Error::not_found("Template", template_id));
        }
        Ok(())
    }
}
