//! Parsing boundary between loosely shaped service JSON and the typed session entities.
//!
//! Each function accepts every shape the service is known to produce and fails with
//! [`PathplanError::MissingFieldError`] rather than defaulting when a required field is absent.

use crate::domain::model::{
    Capabilities, OpportunitySet, Roadmap, UploadResult, MAX_READINESS_SCORE,
};
use crate::utils::error::{PathplanError, Result};
use serde_json::Value;

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn require<'a>(value: &'a Value, entity: &'static str, field: &'static str) -> Result<&'a Value> {
    present(value.get(field)).ok_or(PathplanError::MissingFieldError { entity, field })
}

/// `{ result: { capabilities, opportunities?, roadmap? } }`
pub fn parse_upload_result(body: Value) -> Result<UploadResult> {
    let mut result = match body {
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Object(result)) => result,
            _ => {
                return Err(PathplanError::MissingFieldError {
                    entity: "upload response",
                    field: "result",
                })
            }
        },
        _ => {
            return Err(PathplanError::MissingFieldError {
                entity: "upload response",
                field: "result",
            })
        }
    };

    let capabilities = result
        .remove("capabilities")
        .filter(|v| !v.is_null())
        .ok_or(PathplanError::MissingFieldError {
            entity: "upload response",
            field: "capabilities",
        })?;

    Ok(UploadResult {
        capabilities,
        opportunities: result.remove("opportunities").filter(|v| !v.is_null()),
        roadmap: result.remove("roadmap").filter(|v| !v.is_null()),
    })
}

pub fn parse_capabilities(value: &Value) -> Result<Capabilities> {
    const ENTITY: &str = "capabilities";
    for field in [
        "technical_skills",
        "soft_skills",
        "career_readiness_score",
        "summary",
    ] {
        require(value, ENTITY, field)?;
    }
    let capabilities: Capabilities = serde_json::from_value(value.clone())?;
    if capabilities.career_readiness_score > MAX_READINESS_SCORE {
        return Err(PathplanError::InvalidFieldError {
            entity: ENTITY,
            field: "career_readiness_score",
            reason: format!(
                "{} is outside 0..={}",
                capabilities.career_readiness_score, MAX_READINESS_SCORE
            ),
        });
    }
    Ok(capabilities)
}

/// Accepts the bare set or the `{ opportunities: ... }` envelope the service answers with.
pub fn parse_opportunities(value: &Value) -> Result<OpportunitySet> {
    let inner = present(value.get("opportunities")).unwrap_or(value);
    if !inner.is_object() {
        return Err(PathplanError::MissingFieldError {
            entity: "opportunity analysis",
            field: "opportunities",
        });
    }
    let set: OpportunitySet = serde_json::from_value(inner.clone())?;
    Ok(set)
}

/// Accepts `Roadmap` or `{ roadmap: Roadmap }`. A roadmap without a `sections`
/// sequence is rejected, so callers can show their empty state.
pub fn normalize_roadmap(value: &Value) -> Result<Roadmap> {
    let inner = present(value.get("roadmap")).unwrap_or(value);
    match inner.get("sections") {
        Some(Value::Array(_)) => {}
        _ => {
            return Err(PathplanError::MissingFieldError {
                entity: "roadmap",
                field: "sections",
            })
        }
    }
    let roadmap: Roadmap = serde_json::from_value(inner.clone())?;
    Ok(roadmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sections() -> Value {
        json!([{
            "title": "Foundations",
            "nodes": [{
                "skill": "SQL",
                "level": "Beginner",
                "description": "Query relational data",
                "resources": ["sql-course"]
            }]
        }])
    }

    #[test]
    fn roadmap_unwrap_yields_identical_structure() {
        let bare = json!({ "sections": sections(), "timeline_months": 4 });
        let wrapped = json!({ "roadmap": { "sections": sections(), "timeline_months": 4 } });

        let a = normalize_roadmap(&bare).unwrap();
        let b = normalize_roadmap(&wrapped).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.sections[0].nodes[0].skill, "SQL");
        assert_eq!(a.timeline_or_default(), 4);
    }

    #[test]
    fn roadmap_without_sections_is_rejected() {
        for value in [json!({}), json!({ "roadmap": {} }), json!({ "sections": "none" })] {
            let err = normalize_roadmap(&value).unwrap_err();
            assert!(matches!(
                err,
                PathplanError::MissingFieldError { entity: "roadmap", field: "sections" }
            ));
        }
    }

    #[test]
    fn roadmap_with_null_wrapper_falls_back_to_outer_value() {
        let value = json!({ "roadmap": null, "sections": [] });
        let roadmap = normalize_roadmap(&value).unwrap();
        assert!(roadmap.sections.is_empty());
        assert_eq!(roadmap.timeline_or_default(), 3);
    }

    #[test]
    fn node_resources_default_to_empty() {
        let value = json!({ "sections": [{ "title": "Core", "nodes": [
            { "skill": "Rust", "level": "Intermediate", "description": "ownership" }
        ]}]});
        let roadmap = normalize_roadmap(&value).unwrap();
        assert!(roadmap.sections[0].nodes[0].resources.is_empty());
    }

    #[test]
    fn upload_result_keeps_optional_artifacts() {
        let body = json!({ "result": {
            "capabilities": { "technical_skills": ["SQL"] },
            "opportunities": { "safe_opportunities": ["Data Analyst"] },
            "roadmap": null
        }});
        let upload = parse_upload_result(body).unwrap();
        assert_eq!(upload.capabilities["technical_skills"][0], "SQL");
        assert!(upload.opportunities.is_some());
        assert!(upload.roadmap.is_none());
    }

    #[test]
    fn upload_result_requires_capabilities() {
        let err = parse_upload_result(json!({ "result": {} })).unwrap_err();
        assert!(matches!(err, PathplanError::MissingFieldError { field: "capabilities", .. }));

        let err = parse_upload_result(json!({ "detail": "ok" })).unwrap_err();
        assert!(matches!(err, PathplanError::MissingFieldError { field: "result", .. }));
    }

    #[test]
    fn opportunities_accept_envelope_or_bare_set() {
        let wrapped = json!({ "opportunities": { "stretch_opportunities": ["ML Engineer"] } });
        let bare = json!({ "stretch_opportunities": ["ML Engineer"] });
        assert_eq!(
            parse_opportunities(&wrapped).unwrap(),
            parse_opportunities(&bare).unwrap()
        );
        assert!(parse_opportunities(&json!("nope")).is_err());
    }

    #[test]
    fn capabilities_report_the_missing_field() {
        let err = parse_capabilities(&json!({
            "technical_skills": [], "soft_skills": [], "summary": "x"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            PathplanError::MissingFieldError { field: "career_readiness_score", .. }
        ));

        let ok = parse_capabilities(&json!({
            "technical_skills": ["SQL"],
            "soft_skills": ["Communication"],
            "career_readiness_score": 72,
            "summary": "Analyst profile"
        }))
        .unwrap();
        assert_eq!(ok.career_readiness_score, 72);
    }

    #[test]
    fn readiness_score_above_hundred_is_rejected() {
        let err = parse_capabilities(&json!({
            "technical_skills": [],
            "soft_skills": [],
            "career_readiness_score": 250,
            "summary": ""
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            PathplanError::InvalidFieldError { field: "career_readiness_score", .. }
        ));

        let edge = parse_capabilities(&json!({
            "technical_skills": [],
            "soft_skills": [],
            "career_readiness_score": 100,
            "summary": ""
        }))
        .unwrap();
        assert_eq!(edge.career_readiness_score, 100);
    }
}
