use serde::{Deserialize, Serialize};

use crate::spec::NetworkDomainSpec;

/// What `execute` will do for one declared (or orphaned) network domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// In sync, nothing to do.
    Ok,
    Create,
    /// Mutable fields drifted; one edit call.
    Modify,
    /// An immutable field changed; delete then create.
    Replace,
    /// In state but no longer declared.
    Delete,
}

/// Structured before/after for a single field that doesn't match desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDrift {
    /// Machine-readable field name, e.g. "plan"
    pub field: String,
    /// What we want
    pub expected: String,
    /// What the compute API has
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Config label the domain is declared under.
    pub label: String,
    pub action: Action,
    /// Remote id, if the domain exists.
    pub id: Option<String>,
    /// Desired spec; `None` for orphans.
    pub desired: Option<NetworkDomainSpec>,
    pub drift: Vec<FieldDrift>,
}

impl PlanEntry {
    pub fn is_actionable(&self) -> bool {
        self.action != Action::Ok
    }
}

pub fn has_changes(entries: &[PlanEntry]) -> bool {
    entries.iter().any(PlanEntry::is_actionable)
}

/// Field-level differences between the observed and the desired spec.
pub fn field_drift(actual: &NetworkDomainSpec, expected: &NetworkDomainSpec) -> Vec<FieldDrift> {
    let fields = [
        ("name", &actual.name, &expected.name),
        ("description", &actual.description, &expected.description),
        ("plan", &actual.plan, &expected.plan),
        ("datacenter", &actual.datacenter_id, &expected.datacenter_id),
    ];

    fields
        .into_iter()
        .filter(|(_, actual, expected)| actual != expected)
        .map(|(field, actual, expected)| FieldDrift {
            field: field.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
        .collect()
}
