//! Plain-text rendering of stage results for the terminal.

use crate::core::workflow::{
    CapabilityReport, OpportunityReport, OpportunitySource, RoadmapDisplay, RoadmapOrigin,
    RoadmapView, SessionSummary,
};
use crate::domain::model::{Roadmap, StoreKey};
use std::fmt;

const DEFAULT_ADVICE: &str = "Review these opportunities and select a path aligned with your current readiness and long-term goals.";
const DEFAULT_ROADMAP_TITLE: &str =
    "A structured, realistic path generated from your actual profile and readiness.";

/// Capability assessment screen.
pub struct CapabilitiesView<'a>(pub &'a CapabilityReport);

impl fmt::Display for CapabilitiesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let c = &report.capabilities;
        writeln!(f, "Capability Assessment")?;
        writeln!(f, "Career Readiness: {}/100", c.career_readiness_score)?;
        writeln!(f, "Target Role: {}", report.target_role)?;
        writeln!(f, "Technical Skills: {}", c.technical_skills.join(", "))?;
        writeln!(f, "Soft Skills:")?;
        for skill in &c.soft_skills {
            writeln!(f, "  - {}", skill)?;
        }
        writeln!(f, "Summary: {}", c.summary)?;
        if let Some(insight) = &report.professional_insight {
            writeln!(f, "Professional Presence: {}", insight)?;
        }
        writeln!(f, "Next: pathplan opportunities")
    }
}

pub struct OpportunitiesView<'a>(pub &'a OpportunityReport);

impl fmt::Display for OpportunitiesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let set = &report.opportunities;
        writeln!(f, "Career Opportunities")?;
        if report.source == OpportunitySource::Session {
            writeln!(f, "(from this session's analysis)")?;
        }

        for (title, roles) in [
            ("Safe", &set.safe_opportunities),
            ("Stretch", &set.stretch_opportunities),
            ("Aspirational", &set.aspirational_opportunities),
        ] {
            writeln!(f, "\n{} Opportunities", title)?;
            if roles.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for role in roles.iter() {
                writeln!(f, "  - {}", role)?;
            }
        }

        let advice = if set.application_advice.trim().is_empty() {
            DEFAULT_ADVICE
        } else {
            set.application_advice.as_str()
        };
        writeln!(f, "\nAI Strategic Insight: \"{}\"", advice)?;
        writeln!(f, "Next: pathplan select \"<role>\"")
    }
}

/// Roadmap screen, including its empty state.
pub struct RoadmapScreen<'a>(pub &'a RoadmapView);

impl fmt::Display for RoadmapScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            RoadmapView::Ready(display) => write_roadmap(f, display),
            RoadmapView::NotFound => {
                writeln!(f, "Roadmap Not Found")?;
                writeln!(
                    f,
                    "Please complete capability analysis before generating a roadmap."
                )?;
                writeln!(f, "Go to analysis: pathplan analyze --resume <file>")
            }
        }
    }
}

fn write_roadmap(f: &mut fmt::Formatter<'_>, display: &RoadmapDisplay) -> fmt::Result {
    let roadmap: &Roadmap = &display.roadmap;
    writeln!(f, "Career Roadmap")?;

    write!(f, "Target Role: {}", display.role.role)?;
    if let Some(badge) = display.role.source.badge() {
        write!(f, " [{}]", badge)?;
    }
    writeln!(f)?;
    writeln!(
        f,
        "Estimated Timeline: {} Months",
        roadmap.timeline_or_default()
    )?;
    if display.origin == RoadmapOrigin::RoleSpecific {
        writeln!(f, "(role-specific plan)")?;
    }

    for (idx, section) in roadmap.sections.iter().enumerate() {
        writeln!(f, "\n{}. {}", idx + 1, section.title)?;
        for node in &section.nodes {
            writeln!(f, "  * {} [{}]", node.skill, node.level)?;
            writeln!(f, "    {}", node.description)?;
            if !node.resources.is_empty() {
                let tags: Vec<String> = node.resources.iter().map(|r| format!("#{}", r)).collect();
                writeln!(f, "    {}", tags.join(" "))?;
            }
        }
    }

    let title = roadmap
        .roadmap_title
        .as_deref()
        .unwrap_or(DEFAULT_ROADMAP_TITLE);
    writeln!(f, "\nAI Strategy Overview: \"{}\"", title)
}

pub struct SummaryView<'a>(pub &'a SessionSummary);

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Stage: {}", summary.stage)?;
        for key in StoreKey::ALL {
            let mark = if summary.present.contains(&key) { "x" } else { " " };
            writeln!(f, "  [{}] {}", mark, key)?;
        }
        Ok(())
    }
}

pub fn render_capabilities(report: &CapabilityReport) -> String {
    CapabilitiesView(report).to_string()
}

pub fn render_opportunities(report: &OpportunityReport) -> String {
    OpportunitiesView(report).to_string()
}

pub fn render_roadmap(view: &RoadmapView) -> String {
    RoadmapScreen(view).to_string()
}

pub fn render_summary(summary: &SessionSummary) -> String {
    SummaryView(summary).to_string()
}
