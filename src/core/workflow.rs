use crate::core::client::effective_target_role;
use crate::core::normalize::{normalize_roadmap, parse_capabilities, parse_opportunities};
use crate::core::role::resolve_role;
use crate::domain::model::{
    Capabilities, OpportunitySet, ResolvedRole, ResumeDocument, Roadmap, StoreKey,
};
use crate::domain::ports::{AnalysisService, SessionStore};
use crate::utils::error::{PathplanError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde_json::Value;
use std::fmt;

pub const MISSING_RESUME_MESSAGE: &str = "Please upload your resume to continue.";
pub const MISSING_PROFILE_MESSAGE: &str = "No profile data found. Please upload your resume first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkflowStage {
    Intake,
    Analyzed,
    OpportunitiesShown,
    RoleChosen,
    RoadmapShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Analyze,
    ShowOpportunities,
    ChooseRole,
    ShowRoadmap,
    Restart,
}

impl WorkflowStage {
    /// Stage reached after `event`, wherever the workflow was before.
    pub fn after(self, event: WorkflowEvent) -> WorkflowStage {
        match event {
            WorkflowEvent::Analyze => WorkflowStage::Analyzed,
            WorkflowEvent::ShowOpportunities => WorkflowStage::OpportunitiesShown,
            WorkflowEvent::ChooseRole => WorkflowStage::RoleChosen,
            WorkflowEvent::ShowRoadmap => WorkflowStage::RoadmapShown,
            WorkflowEvent::Restart => WorkflowStage::Intake,
        }
    }

    /// Whether `event` follows the linear path from this stage. Reloading the current
    /// view counts as forward; the roadmap may be shown straight after intake when the
    /// upload already carried one.
    pub fn is_forward(self, event: WorkflowEvent) -> bool {
        use WorkflowEvent::*;
        use WorkflowStage::*;
        matches!(
            (self, event),
            (_, Restart)
                | (Intake, Analyze)
                | (Analyzed | OpportunitiesShown, ShowOpportunities)
                | (OpportunitiesShown | RoleChosen, ChooseRole)
                | (Analyzed | OpportunitiesShown | RoleChosen | RoadmapShown, ShowRoadmap)
        )
    }

    /// Best guess at where a persisted session left off.
    pub fn infer<S: SessionStore>(store: &S) -> Result<WorkflowStage> {
        if store.get(StoreKey::SelectedRole)?.is_some() {
            Ok(WorkflowStage::RoleChosen)
        } else if store.get(StoreKey::Capabilities)?.is_some() {
            Ok(WorkflowStage::Analyzed)
        } else {
            Ok(WorkflowStage::Intake)
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStage::Intake => "intake",
            WorkflowStage::Analyzed => "analyzed",
            WorkflowStage::OpportunitiesShown => "opportunities shown",
            WorkflowStage::RoleChosen => "role chosen",
            WorkflowStage::RoadmapShown => "roadmap shown",
        };
        f.write_str(name)
    }
}

/// Input collected by the intake screen.
#[derive(Debug, Clone, Default)]
pub struct IntakeRequest {
    pub resume: Option<ResumeDocument>,
    pub target_role: String,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CapabilityReport {
    pub capabilities: Capabilities,
    pub target_role: String,
    pub opportunities_included: bool,
    pub roadmap_included: bool,
    pub professional_insight: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunitySource {
    /// Reused from the single-pass upload response or an earlier analysis.
    Session,
    Service,
}

#[derive(Debug, Clone)]
pub struct OpportunityReport {
    pub opportunities: OpportunitySet,
    pub source: OpportunitySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadmapOrigin {
    RoleSpecific,
    Initial,
}

#[derive(Debug, Clone)]
pub struct RoadmapDisplay {
    pub roadmap: Roadmap,
    pub role: ResolvedRole,
    pub origin: RoadmapOrigin,
}

#[derive(Debug, Clone)]
pub enum RoadmapView {
    Ready(RoadmapDisplay),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub stage: WorkflowStage,
    pub present: Vec<StoreKey>,
}

/// Drives the four stages over a session store and the analysis service.
pub struct Orchestrator<A: AnalysisService, S: SessionStore> {
    service: A,
    store: S,
    stage: WorkflowStage,
}

impl<A: AnalysisService, S: SessionStore> Orchestrator<A, S> {
    pub fn new(service: A, store: S) -> Self {
        Self {
            service,
            store,
            stage: WorkflowStage::Intake,
        }
    }

    /// Picks up a session persisted by an earlier run.
    pub fn resume(service: A, store: S) -> Result<Self> {
        let stage = WorkflowStage::infer(&store)?;
        Ok(Self {
            service,
            store,
            stage,
        })
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn service(&self) -> &A {
        &self.service
    }

    fn enter(&mut self, event: WorkflowEvent) {
        if !self.stage.is_forward(event) {
            tracing::debug!("Revisiting {:?} from stage {}", event, self.stage);
        }
        self.stage = self.stage.after(event);
    }

    fn stored_string(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self
            .store
            .get(key)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    fn require_capabilities(&self) -> Result<Value> {
        self.store
            .get(StoreKey::Capabilities)?
            .ok_or_else(|| PathplanError::validation(MISSING_PROFILE_MESSAGE))
    }

    /// Stage A: upload the resume and record the capability profile.
    pub async fn analyze(&mut self, request: IntakeRequest) -> Result<CapabilityReport> {
        let resume = request
            .resume
            .as_ref()
            .ok_or_else(|| PathplanError::validation(MISSING_RESUME_MESSAGE))?;

        if self.stage != WorkflowStage::Intake {
            self.enter(WorkflowEvent::Restart);
        }

        let target_role = effective_target_role(&request.target_role).to_string();
        let upload = self.service.submit_resume(resume, &request.target_role).await?;
        let capabilities = parse_capabilities(&upload.capabilities)?;

        let opportunities_included = upload.opportunities.is_some();
        let roadmap_included = upload.roadmap.is_some();

        // Both initial slots are replaced on every upload; null reads as absent.
        self.store.set(StoreKey::Capabilities, upload.capabilities)?;
        self.store.set(
            StoreKey::InitialOpportunities,
            upload.opportunities.unwrap_or(Value::Null),
        )?;
        self.store
            .set(StoreKey::InitialRoadmap, upload.roadmap.unwrap_or(Value::Null))?;
        self.store
            .set(StoreKey::TargetRole, Value::String(target_role.clone()))?;

        tracing::info!(
            "Capabilities stored (readiness {}/100, opportunities included: {}, roadmap included: {})",
            capabilities.career_readiness_score,
            opportunities_included,
            roadmap_included
        );

        let professional_insight = self
            .try_professional_insight(
                request.github_url.as_deref(),
                request.linkedin_url.as_deref(),
                &target_role,
            )
            .await;

        self.enter(WorkflowEvent::Analyze);

        Ok(CapabilityReport {
            capabilities,
            target_role,
            opportunities_included,
            roadmap_included,
            professional_insight,
        })
    }

    async fn try_professional_insight(
        &self,
        github_url: Option<&str>,
        linkedin_url: Option<&str>,
        target_role: &str,
    ) -> Option<Value> {
        let github = github_url.map(str::trim).unwrap_or_default();
        let linkedin = linkedin_url.map(str::trim).unwrap_or_default();
        if github.is_empty() && linkedin.is_empty() {
            return None;
        }

        match self
            .service
            .fetch_professional_insight(github, linkedin, target_role)
            .await
        {
            Ok(insight) => Some(insight),
            Err(e) => {
                tracing::warn!("Professional insight unavailable: {}", e);
                None
            }
        }
    }

    /// Stage B: reuse stored opportunities when present, otherwise ask the service once.
    pub async fn discover_opportunities(&mut self) -> Result<OpportunityReport> {
        let capabilities = self.require_capabilities()?;

        let report = match self.store.get(StoreKey::InitialOpportunities)? {
            Some(stored) => {
                tracing::info!("Reusing opportunities from the session, skipping analysis call");
                OpportunityReport {
                    opportunities: parse_opportunities(&stored)?,
                    source: OpportunitySource::Session,
                }
            }
            None => {
                let opportunities = self.service.fetch_opportunities(&capabilities, "").await?;
                self.store.set(
                    StoreKey::InitialOpportunities,
                    serde_json::to_value(&opportunities)?,
                )?;
                OpportunityReport {
                    opportunities,
                    source: OpportunitySource::Service,
                }
            }
        };

        self.enter(WorkflowEvent::ShowOpportunities);
        Ok(report)
    }

    /// The only writer of `selected_role`. Needs a profile, and the role must be one of
    /// the stored opportunities when a set is stored.
    pub fn select_role(&mut self, role: &str) -> Result<()> {
        self.require_capabilities()?;
        validate_non_empty_string("Selected role", role)?;
        let role = role.trim();

        if let Some(stored) = self.store.get(StoreKey::InitialOpportunities)? {
            if !parse_opportunities(&stored)?.contains(role) {
                return Err(PathplanError::validation(format!(
                    "{} is not one of the offered opportunities.",
                    role
                )));
            }
        }

        self.store
            .set(StoreKey::SelectedRole, Value::String(role.to_string()))?;
        tracing::info!("Selected role: {}", role);
        self.enter(WorkflowEvent::ChooseRole);
        Ok(())
    }

    /// Requests a roadmap for one role and stores it as the role-specific roadmap.
    /// The goal defaults to the selected role, then to the intake role.
    pub async fn plan_roadmap(&mut self, goal: Option<&str>) -> Result<Roadmap> {
        let capabilities = self.require_capabilities()?;

        let goal = match goal.map(str::trim).filter(|g| !g.is_empty()) {
            Some(goal) => goal.to_string(),
            None => self
                .stored_string(StoreKey::SelectedRole)?
                .or(self.stored_string(StoreKey::TargetRole)?)
                .filter(|g| !g.trim().is_empty())
                .ok_or_else(|| {
                    PathplanError::validation(
                        "No role to plan for. Select an opportunity or pass a goal.",
                    )
                })?,
        };

        let response = self.service.fetch_roadmap(&capabilities, &goal).await?;
        let roadmap = normalize_roadmap(&response)?;
        self.store.set(StoreKey::RoadmapResult, response)?;

        tracing::info!(
            "Stored role-specific roadmap for {} ({} sections)",
            goal,
            roadmap.sections.len()
        );
        Ok(roadmap)
    }

    /// Stage C: pick the stored roadmap, normalize it and resolve the role label.
    pub fn load_roadmap(&mut self) -> Result<RoadmapView> {
        let (stored, origin) = match self.store.get(StoreKey::RoadmapResult)? {
            Some(v) => (v, RoadmapOrigin::RoleSpecific),
            None => match self.store.get(StoreKey::InitialRoadmap)? {
                Some(v) => (v, RoadmapOrigin::Initial),
                None => return Ok(RoadmapView::NotFound),
            },
        };

        let roadmap = match normalize_roadmap(&stored) {
            Ok(roadmap) => roadmap,
            Err(e) => {
                tracing::warn!("Stored roadmap is unusable: {}", e);
                return Ok(RoadmapView::NotFound);
            }
        };

        let selected = self.stored_string(StoreKey::SelectedRole)?;
        let fallback = self.stored_string(StoreKey::TargetRole)?;
        let role = resolve_role(
            selected.as_deref(),
            roadmap.target_role.as_deref(),
            fallback.as_deref(),
        );

        self.enter(WorkflowEvent::ShowRoadmap);
        Ok(RoadmapView::Ready(RoadmapDisplay {
            roadmap,
            role,
            origin,
        }))
    }

    pub async fn professional_insight(
        &self,
        github_url: &str,
        linkedin_url: &str,
        target_role: &str,
    ) -> Result<Value> {
        self.service
            .fetch_professional_insight(github_url, linkedin_url, target_role)
            .await
    }

    /// Back to intake. Stored results survive unless `clear_session` is set.
    pub fn restart(&mut self, clear_session: bool) -> Result<()> {
        if clear_session {
            self.store.clear()?;
            tracing::info!("Session cleared");
        }
        self.enter(WorkflowEvent::Restart);
        Ok(())
    }

    pub fn summary(&self) -> Result<SessionSummary> {
        let mut present = Vec::new();
        for key in StoreKey::ALL {
            if self.store.get(key)?.is_some() {
                present.push(key);
            }
        }
        Ok(SessionSummary {
            stage: self.stage,
            present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::MemorySessionStore;
    use crate::domain::model::{RoleSource, UploadResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Calls {
        upload: Arc<AtomicUsize>,
        opportunities: Arc<AtomicUsize>,
        roadmap: Arc<AtomicUsize>,
        insight: Arc<AtomicUsize>,
    }

    #[derive(Clone)]
    struct MockService {
        calls: Calls,
        upload: Value,
        opportunities: Value,
        roadmap: Value,
        insight_fails: bool,
    }

    impl MockService {
        fn new(upload: Value) -> Self {
            Self {
                calls: Calls::default(),
                upload,
                opportunities: json!({ "opportunities": {
                    "safe_opportunities": ["Business Analyst"],
                    "application_advice": "Apply now"
                }}),
                roadmap: json!({ "roadmap": {
                    "sections": [{ "title": "Deep Dive", "nodes": [] }],
                    "timeline_months": 6,
                    "target_role": "Data Engineer"
                }}),
                insight_fails: false,
            }
        }
    }

    #[async_trait]
    impl AnalysisService for MockService {
        async fn submit_resume(&self, _: &ResumeDocument, _: &str) -> Result<UploadResult> {
            self.calls.upload.fetch_add(1, Ordering::SeqCst);
            crate::core::normalize::parse_upload_result(self.upload.clone())
        }

        async fn fetch_opportunities(&self, _: &Value, _: &str) -> Result<OpportunitySet> {
            self.calls.opportunities.fetch_add(1, Ordering::SeqCst);
            parse_opportunities(&self.opportunities)
        }

        async fn fetch_roadmap(&self, _: &Value, _: &str) -> Result<Value> {
            self.calls.roadmap.fetch_add(1, Ordering::SeqCst);
            Ok(self.roadmap.clone())
        }

        async fn fetch_professional_insight(&self, _: &str, _: &str, _: &str) -> Result<Value> {
            self.calls.insight.fetch_add(1, Ordering::SeqCst);
            if self.insight_fails {
                Err(PathplanError::ServiceError {
                    endpoint: "/professional-insight".to_string(),
                    status: 500,
                    message: None,
                })
            } else {
                Ok(json!({ "score": 80 }))
            }
        }
    }

    fn capabilities() -> Value {
        json!({
            "technical_skills": ["SQL", "Python"],
            "soft_skills": ["Communication"],
            "career_readiness_score": 68,
            "summary": "Early-career analyst"
        })
    }

    fn single_pass_upload() -> Value {
        json!({ "result": {
            "capabilities": capabilities(),
            "opportunities": { "safe_opportunities": ["Data Analyst"] },
            "roadmap": { "sections": [{ "title": "Foundations", "nodes": [{
                "skill": "SQL", "level": "Beginner", "description": "...", "resources": ["sql-course"]
            }]}], "timeline_months": 4 }
        }})
    }

    fn intake(role: &str) -> IntakeRequest {
        IntakeRequest {
            resume: Some(ResumeDocument::new("cv.pdf", b"%PDF-1.4".to_vec())),
            target_role: role.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_resume_fails_without_network() {
        let service = MockService::new(single_pass_upload());
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, MemorySessionStore::new());

        let err = orchestrator
            .analyze(IntakeRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.user_friendly_message(), MISSING_RESUME_MESSAGE);
        assert_eq!(calls.upload.load(Ordering::SeqCst), 0);
        assert_eq!(orchestrator.stage(), WorkflowStage::Intake);
        assert!(orchestrator.store().is_empty().unwrap());
    }

    #[tokio::test]
    async fn single_pass_upload_fills_session_slots() {
        let store = MemorySessionStore::new();
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());

        let report = orchestrator.analyze(intake("")).await.unwrap();

        assert_eq!(report.capabilities.career_readiness_score, 68);
        assert_eq!(report.target_role, "General Professional");
        assert!(report.opportunities_included && report.roadmap_included);
        assert!(report.professional_insight.is_none());
        assert_eq!(store.get(StoreKey::Capabilities).unwrap(), Some(capabilities()));
        assert!(store.get(StoreKey::InitialOpportunities).unwrap().is_some());
        assert!(store.get(StoreKey::InitialRoadmap).unwrap().is_some());
        assert_eq!(
            store.get(StoreKey::TargetRole).unwrap(),
            Some(json!("General Professional"))
        );
        assert_eq!(orchestrator.stage(), WorkflowStage::Analyzed);
    }

    #[tokio::test]
    async fn stored_opportunities_skip_the_network() {
        let service = MockService::new(single_pass_upload());
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, MemorySessionStore::new());
        orchestrator.analyze(intake("Analyst")).await.unwrap();

        let report = orchestrator.discover_opportunities().await.unwrap();

        assert_eq!(report.source, OpportunitySource::Session);
        assert_eq!(report.opportunities.safe_opportunities, vec!["Data Analyst"]);
        assert_eq!(calls.opportunities.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn opportunities_are_fetched_once_then_reused() {
        let upload = json!({ "result": { "capabilities": capabilities() } });
        let service = MockService::new(upload);
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, MemorySessionStore::new());
        orchestrator.analyze(intake("")).await.unwrap();

        let first = orchestrator.discover_opportunities().await.unwrap();
        let second = orchestrator.discover_opportunities().await.unwrap();

        assert_eq!(first.source, OpportunitySource::Service);
        assert_eq!(second.source, OpportunitySource::Session);
        assert_eq!(first.opportunities, second.opportunities);
        assert_eq!(calls.opportunities.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn opportunities_without_profile_is_a_validation_error() {
        let service = MockService::new(single_pass_upload());
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, MemorySessionStore::new());

        let err = orchestrator.discover_opportunities().await.unwrap_err();

        assert!(matches!(err, PathplanError::ValidationError { .. }));
        assert_eq!(err.user_friendly_message(), MISSING_PROFILE_MESSAGE);
        assert_eq!(calls.opportunities.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn selected_role_wins_on_roadmap_view() {
        let store = MemorySessionStore::new();
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());
        orchestrator.analyze(intake("Analyst")).await.unwrap();
        orchestrator.discover_opportunities().await.unwrap();
        orchestrator.select_role("Data Analyst").unwrap();

        let RoadmapView::Ready(display) = orchestrator.load_roadmap().unwrap() else {
            panic!("expected a roadmap");
        };

        assert_eq!(display.role.role, "Data Analyst");
        assert_eq!(display.role.source, RoleSource::Selected);
        assert_eq!(display.origin, RoadmapOrigin::Initial);
        assert_eq!(display.roadmap.timeline_or_default(), 4);
        assert_eq!(orchestrator.stage(), WorkflowStage::RoadmapShown);
    }

    #[tokio::test]
    async fn role_label_is_recomputed_on_every_load() {
        let store = MemorySessionStore::new();
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());
        orchestrator.analyze(intake("Analyst")).await.unwrap();

        let RoadmapView::Ready(before) = orchestrator.load_roadmap().unwrap() else {
            panic!("expected a roadmap");
        };
        assert_eq!(before.role.role, "Analyst");
        assert_eq!(before.role.source, RoleSource::Fallback);

        orchestrator.select_role("Data Analyst").unwrap();
        let RoadmapView::Ready(after) = orchestrator.load_roadmap().unwrap() else {
            panic!("expected a roadmap");
        };
        assert_eq!(after.role.role, "Data Analyst");
        assert_eq!(after.role.source, RoleSource::Selected);
    }

    #[tokio::test]
    async fn role_specific_roadmap_takes_precedence() {
        let store = MemorySessionStore::new();
        let service = MockService::new(single_pass_upload());
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, store.clone());
        orchestrator.analyze(intake("")).await.unwrap();

        let planned = orchestrator.plan_roadmap(Some("Data Engineer")).await.unwrap();
        assert_eq!(planned.sections[0].title, "Deep Dive");
        assert_eq!(calls.roadmap.load(Ordering::SeqCst), 1);

        let RoadmapView::Ready(display) = orchestrator.load_roadmap().unwrap() else {
            panic!("expected a roadmap");
        };
        assert_eq!(display.origin, RoadmapOrigin::RoleSpecific);
        assert_eq!(display.roadmap.timeline_or_default(), 6);
        assert_eq!(display.role.role, "Data Engineer");
        assert_eq!(display.role.source, RoleSource::Inferred);
    }

    #[tokio::test]
    async fn plan_without_any_role_is_rejected() {
        let store = MemorySessionStore::new();
        store.set(StoreKey::Capabilities, capabilities()).unwrap();
        let service = MockService::new(single_pass_upload());
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, store);

        let err = orchestrator.plan_roadmap(None).await.unwrap_err();
        assert!(matches!(err, PathplanError::ValidationError { .. }));
        assert_eq!(calls.roadmap.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unusable_planner_response_is_not_stored() {
        let store = MemorySessionStore::new();
        let mut service = MockService::new(single_pass_upload());
        service.roadmap = json!({ "roadmap": {} });
        let mut orchestrator = Orchestrator::new(service, store.clone());
        orchestrator.analyze(intake("")).await.unwrap();

        assert!(orchestrator.plan_roadmap(Some("X")).await.is_err());
        assert_eq!(store.get(StoreKey::RoadmapResult).unwrap(), None);
    }

    #[test]
    fn roadmap_view_is_empty_without_sections() {
        for stored in [json!({}), json!({ "roadmap": {} })] {
            let store = MemorySessionStore::new();
            store.set(StoreKey::InitialRoadmap, stored).unwrap();
            let mut orchestrator =
                Orchestrator::new(MockService::new(single_pass_upload()), store);
            assert!(matches!(
                orchestrator.load_roadmap().unwrap(),
                RoadmapView::NotFound
            ));
        }
    }

    #[test]
    fn roadmap_view_is_empty_for_fresh_session() {
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), MemorySessionStore::new());
        assert!(matches!(
            orchestrator.load_roadmap().unwrap(),
            RoadmapView::NotFound
        ));
        assert_eq!(orchestrator.stage(), WorkflowStage::Intake);
    }

    #[test]
    fn select_role_requires_a_profile() {
        let store = MemorySessionStore::new();
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());

        let err = orchestrator.select_role("Astronaut").unwrap_err();

        assert_eq!(err.user_friendly_message(), MISSING_PROFILE_MESSAGE);
        assert_eq!(store.get(StoreKey::SelectedRole).unwrap(), None);
        assert_eq!(orchestrator.stage(), WorkflowStage::Intake);
    }

    #[test]
    fn select_role_rejects_roles_that_were_not_offered() {
        let store = MemorySessionStore::new();
        store.set(StoreKey::Capabilities, capabilities()).unwrap();
        store
            .set(
                StoreKey::InitialOpportunities,
                json!({ "safe_opportunities": ["Data Analyst"] }),
            )
            .unwrap();
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());

        let err = orchestrator.select_role("Chef").unwrap_err();
        assert!(matches!(err, PathplanError::ValidationError { .. }));
        assert_eq!(store.get(StoreKey::SelectedRole).unwrap(), None);

        orchestrator.select_role("Data Analyst").unwrap();
        assert_eq!(
            store.get(StoreKey::SelectedRole).unwrap(),
            Some(json!("Data Analyst"))
        );
        assert_eq!(orchestrator.stage(), WorkflowStage::RoleChosen);
    }

    #[tokio::test]
    async fn new_upload_replaces_both_initial_slots() {
        let store = MemorySessionStore::new();
        let mut first =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());
        first.analyze(intake("Analyst")).await.unwrap();
        first.restart(false).unwrap();

        let capabilities_only = json!({ "result": { "capabilities": capabilities() } });
        let service = MockService::new(capabilities_only);
        let calls = service.calls.clone();
        let mut second = Orchestrator::new(service, store.clone());
        let report = second.analyze(intake("Analyst")).await.unwrap();

        assert!(!report.opportunities_included && !report.roadmap_included);
        assert_eq!(store.get(StoreKey::InitialOpportunities).unwrap(), None);
        assert_eq!(store.get(StoreKey::InitialRoadmap).unwrap(), None);
        assert!(matches!(second.load_roadmap().unwrap(), RoadmapView::NotFound));

        let fresh = second.discover_opportunities().await.unwrap();
        assert_eq!(fresh.source, OpportunitySource::Service);
        assert_eq!(calls.opportunities.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn insight_failure_does_not_block_intake() {
        let mut service = MockService::new(single_pass_upload());
        service.insight_fails = true;
        let calls = service.calls.clone();
        let mut orchestrator = Orchestrator::new(service, MemorySessionStore::new());

        let mut request = intake("Analyst");
        request.github_url = Some("https://github.com/octocat".to_string());
        let report = orchestrator.analyze(request).await.unwrap();

        assert!(report.professional_insight.is_none());
        assert_eq!(calls.insight.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.stage(), WorkflowStage::Analyzed);
    }

    #[tokio::test]
    async fn restart_keeps_session_unless_cleared() {
        let store = MemorySessionStore::new();
        let mut orchestrator =
            Orchestrator::new(MockService::new(single_pass_upload()), store.clone());
        orchestrator.analyze(intake("")).await.unwrap();

        orchestrator.restart(false).unwrap();
        assert_eq!(orchestrator.stage(), WorkflowStage::Intake);
        assert!(store.get(StoreKey::Capabilities).unwrap().is_some());

        orchestrator.restart(true).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn resume_infers_stage_from_session() {
        let store = MemorySessionStore::new();
        let mut first = Orchestrator::new(MockService::new(single_pass_upload()), store.clone());
        first.analyze(intake("")).await.unwrap();
        first.select_role("Data Analyst").unwrap();

        let second = Orchestrator::resume(MockService::new(single_pass_upload()), store).unwrap();
        assert_eq!(second.stage(), WorkflowStage::RoleChosen);
        let summary = second.summary().unwrap();
        assert!(summary.present.contains(&StoreKey::SelectedRole));
        assert!(!summary.present.contains(&StoreKey::RoadmapResult));
    }

    #[test]
    fn linear_path_is_forward() {
        use WorkflowEvent::*;
        let mut stage = WorkflowStage::Intake;
        for event in [Analyze, ShowOpportunities, ChooseRole, ShowRoadmap] {
            assert!(stage.is_forward(event), "{:?} from {}", event, stage);
            stage = stage.after(event);
        }
        assert_eq!(stage, WorkflowStage::RoadmapShown);
        assert!(!stage.is_forward(ShowOpportunities));
        assert!(stage.is_forward(Restart));
        assert_eq!(stage.after(Restart), WorkflowStage::Intake);
    }
}
