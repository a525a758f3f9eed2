use cloudcontrol_compute::{EditNetworkDomain, FieldChange};

use crate::spec::NetworkDomainSpec;

/// Sparse patch of the mutable network domain fields.
///
/// The data center is not representable here; moving a domain is a
/// replacement, never an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateIntent {
    pub name: FieldChange<String>,
    pub description: FieldChange<String>,
    pub plan: FieldChange<String>,
}

impl UpdateIntent {
    /// Fields of `desired` that differ from `previous`.
    pub fn diff(previous: &NetworkDomainSpec, desired: &NetworkDomainSpec) -> Self {
        Self {
            name: changed(&previous.name, &desired.name),
            description: changed(&previous.description, &desired.description),
            plan: changed(&previous.plan, &desired.plan),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_unchanged() && self.description.is_unchanged() && self.plan.is_unchanged()
    }

    pub fn into_edit(self, id: &str) -> EditNetworkDomain {
        EditNetworkDomain {
            id: id.to_string(),
            name: self.name,
            description: self.description,
            plan: self.plan,
        }
    }
}

fn changed(previous: &str, desired: &str) -> FieldChange<String> {
    if previous == desired {
        FieldChange::Unchanged
    } else {
        FieldChange::Set(desired.to_string())
    }
}
