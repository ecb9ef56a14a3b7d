use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Role sent with the upload when the user leaves the target role blank.
pub const DEFAULT_TARGET_ROLE: &str = "General Professional";

/// Every upload and planning request asks for a three month horizon.
pub const TIMEFRAME_MONTHS: u32 = 3;

/// Upper bound of `Capabilities::career_readiness_score`.
pub const MAX_READINESS_SCORE: u8 = 100;

/// Slots of the per-session key/value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Capabilities,
    InitialOpportunities,
    InitialRoadmap,
    TargetRole,
    SelectedRole,
    RoadmapResult,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Capabilities,
        StoreKey::InitialOpportunities,
        StoreKey::InitialRoadmap,
        StoreKey::TargetRole,
        StoreKey::SelectedRole,
        StoreKey::RoadmapResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Capabilities => "capabilities",
            StoreKey::InitialOpportunities => "initial_opportunities",
            StoreKey::InitialRoadmap => "initial_roadmap",
            StoreKey::TargetRole => "target_role",
            StoreKey::SelectedRole => "selected_role",
            StoreKey::RoadmapResult => "roadmapResult",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub career_readiness_score: u8,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunitySet {
    #[serde(default)]
    pub safe_opportunities: Vec<String>,
    #[serde(default)]
    pub stretch_opportunities: Vec<String>,
    #[serde(default)]
    pub aspirational_opportunities: Vec<String>,
    #[serde(default)]
    pub application_advice: String,
}

impl OpportunitySet {
    pub fn is_empty(&self) -> bool {
        self.safe_opportunities.is_empty()
            && self.stretch_opportunities.is_empty()
            && self.aspirational_opportunities.is_empty()
    }

    /// True when `role` is one of the offered cards, in any tier.
    pub fn contains(&self, role: &str) -> bool {
        self.safe_opportunities
            .iter()
            .chain(&self.stretch_opportunities)
            .chain(&self.aspirational_opportunities)
            .any(|r| r == role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub skill: String,
    pub level: String,
    pub description: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapSection {
    pub title: String,
    pub nodes: Vec<RoadmapNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub sections: Vec<RoadmapSection>,
    #[serde(default)]
    pub timeline_months: Option<u32>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub roadmap_title: Option<String>,
}

impl Roadmap {
    pub fn timeline_or_default(&self) -> u32 {
        self.timeline_months.unwrap_or(TIMEFRAME_MONTHS)
    }
}

/// Output of the resume upload. Opportunities and roadmap are present only when the
/// service answered in a single pass; they stay raw JSON until a later stage parses them.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub capabilities: serde_json::Value,
    pub opportunities: Option<serde_json::Value>,
    pub roadmap: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();
        Ok(Self { file_name, bytes })
    }

    pub fn mime_type(&self) -> &'static str {
        let is_pdf = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }
}

/// Where the displayed target role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSource {
    Selected,
    Inferred,
    Fallback,
}

impl RoleSource {
    /// Badge text; the intake fallback is shown untagged.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            RoleSource::Selected => Some("User-Selected"),
            RoleSource::Inferred => Some("AI-Inferred"),
            RoleSource::Fallback => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub role: String,
    pub source: RoleSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keys_use_session_slot_names() {
        let names: Vec<&str> = StoreKey::ALL.iter().map(StoreKey::as_str).collect();
        assert_eq!(
            names,
            vec![
                "capabilities",
                "initial_opportunities",
                "initial_roadmap",
                "target_role",
                "selected_role",
                "roadmapResult"
            ]
        );
    }

    #[test]
    fn resume_mime_type_follows_extension() {
        assert_eq!(ResumeDocument::new("cv.PDF", vec![1]).mime_type(), "application/pdf");
        assert_eq!(
            ResumeDocument::new("cv.docx", vec![1]).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn opportunity_set_lookup_spans_all_tiers() {
        let set = OpportunitySet {
            safe_opportunities: vec!["Data Analyst".into()],
            aspirational_opportunities: vec!["Head of Data".into()],
            ..Default::default()
        };
        assert!(set.contains("Head of Data"));
        assert!(!set.contains("Chef"));
        assert!(!set.is_empty());
        assert!(OpportunitySet::default().is_empty());
    }

    #[test]
    fn badges_distinguish_selected_and_inferred() {
        assert_eq!(RoleSource::Selected.badge(), Some("User-Selected"));
        assert_eq!(RoleSource::Inferred.badge(), Some("AI-Inferred"));
        assert_eq!(RoleSource::Fallback.badge(), None);
    }
}
