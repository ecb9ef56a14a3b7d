use crate::core::normalize::{parse_opportunities, parse_upload_result};
use crate::domain::model::{
    OpportunitySet, ResumeDocument, UploadResult, DEFAULT_TARGET_ROLE, TIMEFRAME_MONTHS,
};
use crate::domain::ports::{AnalysisService, ConfigProvider};
use crate::utils::error::{PathplanError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

pub const UPLOAD_RESUME_PATH: &str = "/upload-resume";
pub const PLANNER_PATH: &str = "/planner/";
pub const OPPORTUNITIES_PATH: &str = "/opportunities";
pub const PROFESSIONAL_INSIGHT_PATH: &str = "/professional-insight";

/// reqwest-backed client for the remote analysis service.
///
/// No timeout and no retry: every call is a single attempt and failures are reported
/// as transport, service, or decode errors.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<Value> {
        tracing::debug!("POST {}", self.url(endpoint));
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{} responded with {}", endpoint, status);

        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| error_message(&v));
            return Err(PathplanError::ServiceError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|source| PathplanError::DecodeError {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn post_json(&self, endpoint: &'static str, payload: &Value) -> Result<Value> {
        let request = self.client.post(self.url(endpoint)).json(payload);
        self.send(endpoint, request).await
    }
}

/// Best-effort extraction of a human readable message from an error body.
fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .find_map(|key| body.get(*key))
        .and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

/// Blank target roles are replaced before upload.
pub fn effective_target_role(target_role: &str) -> &str {
    let trimmed = target_role.trim();
    if trimmed.is_empty() {
        DEFAULT_TARGET_ROLE
    } else {
        trimmed
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn submit_resume(
        &self,
        resume: &ResumeDocument,
        target_role: &str,
    ) -> Result<UploadResult> {
        let part = Part::bytes(resume.bytes.clone())
            .file_name(resume.file_name.clone())
            .mime_str(resume.mime_type())?;

        let form = Form::new()
            .part("resume", part)
            .text("target_role", effective_target_role(target_role).to_string())
            .text("timeframe_months", TIMEFRAME_MONTHS.to_string());

        tracing::info!(
            "Uploading resume {} ({} bytes)",
            resume.file_name,
            resume.bytes.len()
        );
        let request = self.client.post(self.url(UPLOAD_RESUME_PATH)).multipart(form);
        let body = self.send(UPLOAD_RESUME_PATH, request).await?;
        parse_upload_result(body)
    }

    async fn fetch_opportunities(
        &self,
        capabilities: &Value,
        target_role: &str,
    ) -> Result<OpportunitySet> {
        let payload = json!({
            "capabilities": capabilities,
            "market_analysis": {},
            "target_role": target_role,
        });
        let body = self.post_json(OPPORTUNITIES_PATH, &payload).await?;
        parse_opportunities(&body)
    }

    async fn fetch_roadmap(&self, capabilities: &Value, goal: &str) -> Result<Value> {
        let payload = json!({
            "capabilities": capabilities,
            "goal": goal,
            "timeframe_months": TIMEFRAME_MONTHS,
        });
        self.post_json(PLANNER_PATH, &payload).await
    }

    async fn fetch_professional_insight(
        &self,
        github_url: &str,
        linkedin_url: &str,
        target_role: &str,
    ) -> Result<Value> {
        let payload = json!({
            "github_url": github_url,
            "linkedin_url": linkedin_url,
            "target_role": target_role,
            "linkedin_text": { "headline": "", "about": "", "experience": [] },
        });
        self.post_json(PROFESSIONAL_INSIGHT_PATH, &payload).await
    }
}
