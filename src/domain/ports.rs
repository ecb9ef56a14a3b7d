use crate::domain::model::{OpportunitySet, ResumeDocument, StoreKey, UploadResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Per-session key/value store. Last write wins; a missing key reads as `None`.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: StoreKey) -> Result<Option<Value>>;
    fn set(&self, key: StoreKey, value: Value) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn session_file(&self) -> &str;
}

/// The remote analysis service. One attempt per call, no retry.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn submit_resume(&self, resume: &ResumeDocument, target_role: &str)
        -> Result<UploadResult>;

    async fn fetch_opportunities(
        &self,
        capabilities: &Value,
        target_role: &str,
    ) -> Result<OpportunitySet>;

    /// Returns the planner body untouched; it may or may not wrap the roadmap.
    async fn fetch_roadmap(&self, capabilities: &Value, goal: &str) -> Result<Value>;

    async fn fetch_professional_insight(
        &self,
        github_url: &str,
        linkedin_url: &str,
        target_role: &str,
    ) -> Result<Value>;
}
