use crate::domain::model::{ResolvedRole, RoleSource};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Picks the role label for the roadmap view: an explicit selection beats the role the
/// roadmap carries, which beats the intake value. Blank values count as absent. When
/// nothing is available the label is empty and tagged as fallback.
pub fn resolve_role(
    selected: Option<&str>,
    embedded: Option<&str>,
    fallback: Option<&str>,
) -> ResolvedRole {
    let (role, source) = if let Some(role) = non_blank(selected) {
        (role, RoleSource::Selected)
    } else if let Some(role) = non_blank(embedded) {
        (role, RoleSource::Inferred)
    } else {
        (non_blank(fallback).unwrap_or_default(), RoleSource::Fallback)
    };

    ResolvedRole {
        role: role.to_string(),
        source,
    }
}
