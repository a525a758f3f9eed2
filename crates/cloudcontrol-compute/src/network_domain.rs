use std::fmt;

use serde::{Deserialize, Serialize};

/// A network domain as reported by the compute API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDomain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Service plan, e.g. "ESSENTIALS" or "ADVANCED". The API calls it `type`.
    #[serde(rename = "type")]
    pub plan: String,
    /// Source NAT address assigned by the platform once the domain is deployed.
    #[serde(rename = "snatIpv4Address", default)]
    pub nat_ipv4_address: String,
    pub datacenter_id: String,
    /// Raw lifecycle state, e.g. "PENDING_ADD".
    pub state: String,
}

impl NetworkDomain {
    pub fn status(&self) -> DomainStatus {
        DomainStatus::from(self.state.as_str())
    }
}

pub const STATUS_PENDING_ADD: &str = "PENDING_ADD";
pub const STATUS_NORMAL: &str = "NORMAL";
pub const STATUS_PENDING_DELETE: &str = "PENDING_DELETE";

/// Remote lifecycle phase of a network domain.
///
/// Parsing is case-sensitive; anything outside the known vocabulary is kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainStatus {
    PendingAdd,
    Normal,
    PendingDelete,
    Other(String),
}

impl DomainStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PendingAdd => STATUS_PENDING_ADD,
            Self::Normal => STATUS_NORMAL,
            Self::PendingDelete => STATUS_PENDING_DELETE,
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for DomainStatus {
    fn from(raw: &str) -> Self {
        match raw {
            STATUS_PENDING_ADD => Self::PendingAdd,
            STATUS_NORMAL => Self::Normal,
            STATUS_PENDING_DELETE => Self::PendingDelete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to deploy a new network domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployNetworkDomain {
    pub name: String,
    pub description: String,
    pub plan: String,
    pub datacenter_id: String,
}

/// A single field of a partial update.
///
/// `Set(String::new())` clears a field; `Unchanged` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldChange<T> {
    #[default]
    Unchanged,
    Set(T),
}

impl<T> FieldChange<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unchanged => None,
        }
    }
}

/// Request to change the mutable fields of an existing network domain.
///
/// The data center is fixed at deployment and cannot be edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditNetworkDomain {
    pub id: String,
    pub name: FieldChange<String>,
    pub description: FieldChange<String>,
    pub plan: FieldChange<String>,
}
