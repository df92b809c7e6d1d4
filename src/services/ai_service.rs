use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::{Error, Result};

pub const AI_DISABLED: &str = "AI features are disabled. Please provide an API key.";

const CV_PROMPT: &str = "From the following CV document, extract the candidate's full name, email address, phone number, and full postal address. \
Also, extract a list of their key skills (maximum 10) and provide a brief professional synopsis of their experience (2-3 sentences). \
Return a JSON object with the fields name, email, phone, address, skills (array of strings) and synopsis.";

/// Structured fields pulled out of an uploaded CV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvExtraction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub synopsis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiAssistant: Send + Sync {
    async fn parse_cv(&self, document: Vec<u8>, mime_type: String) -> Result<CvExtraction>;

    async fn generate_email(
        &self,
        candidate_name: String,
        job_title: String,
        purpose: String,
    ) -> Result<EmailDraft>;
}

#[derive(Clone)]
pub struct OpenAiAssistant {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiAssistant {
    pub fn new(api_key: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Ai(format!("OpenAI API Error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s.trim()).ok())
            .ok_or_else(|| Error::Ai("Invalid OpenAI response format".to_string()))
    }
}

#[async_trait]
impl AiAssistant for OpenAiAssistant {
    async fn parse_cv(&self, document: Vec<u8>, mime_type: String) -> Result<CvExtraction> {
        let data_url = format!("data:{};base64,{}", mime_type, BASE64.encode(&document));
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": CV_PROMPT },
                        { "type": "file", "file": { "filename": "cv", "file_data": data_url } }
                    ]
                }
            ],
            "response_format": { "type": "json_object" }
        });

        let raw = self.chat_openai(payload).await.map_err(|e| {
            tracing::error!("CV parsing failed: {:?}", e);
            Error::Ai("Failed to extract information from the CV using AI.".to_string())
        })?;
        serde_json::from_value(raw)
            .map_err(|_| Error::Ai("Failed to parse CV. The response was empty.".to_string()))
    }

    async fn generate_email(
        &self,
        candidate_name: String,
        job_title: String,
        purpose: String,
    ) -> Result<EmailDraft> {
        let prompt = format!(
            "Generate a professional email for a recruitment process.\n\n\
             Candidate Name: {candidate_name}\n\
             Job Title: {job_title}\n\
             Purpose of the email: {purpose}\n\n\
             The tone should be professional but friendly. The email should be addressed to the candidate.\n\
             Provide a suitable subject line and a full email body.\n\
             Do not include any sign-off like \"Best regards,\" or the sender's name.\n\
             Return a JSON object with the fields subject and body."
        );
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": { "type": "json_object" }
        });

        let raw = self.chat_openai(payload).await.map_err(|e| {
            tracing::error!("Email generation failed: {:?}", e);
            Error::Ai("Failed to generate email template using AI.".to_string())
        })?;
        serde_json::from_value(raw).map_err(|_| {
            Error::Ai("Failed to generate email template. The response was empty.".to_string())
        })
    }
}
