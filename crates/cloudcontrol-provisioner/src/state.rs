use std::collections::BTreeMap;

use cloudcontrol_compute::NetworkDomain;
use serde::{Deserialize, Serialize};

use crate::spec::NetworkDomainSpec;

/// Provisioner state, persisted to the local state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerState {
    /// Map of config label -> last observed network domain.
    pub resources: BTreeMap<String, NetworkDomainState>,
}

/// Last observed state of a single network domain.
///
/// The remote lifecycle status is deliberately absent: a record only exists
/// once the domain reached `NORMAL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDomainState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub plan: String,
    pub datacenter_id: String,
    #[serde(default)]
    pub nat_ipv4_address: String,
}

impl NetworkDomainState {
    /// Record for a domain whose deploy call just returned `id`.
    pub(crate) fn deployed(id: String, spec: &NetworkDomainSpec) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            description: spec.description.clone(),
            plan: spec.plan.clone(),
            datacenter_id: spec.datacenter_id.clone(),
            nat_ipv4_address: String::new(),
        }
    }

    pub fn from_observed(domain: &NetworkDomain) -> Self {
        Self {
            id: domain.id.clone(),
            name: domain.name.clone(),
            description: domain.description.clone(),
            plan: domain.plan.clone(),
            datacenter_id: domain.datacenter_id.clone(),
            nat_ipv4_address: domain.nat_ipv4_address.clone(),
        }
    }

    /// The configuration this record currently reflects.
    pub fn spec(&self) -> NetworkDomainSpec {
        NetworkDomainSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            plan: self.plan.clone(),
            datacenter_id: self.datacenter_id.clone(),
        }
    }

    /// Copy the mutable fields of `spec` after a successful edit.
    pub(crate) fn apply(&mut self, spec: &NetworkDomainSpec) {
        self.name = spec.name.clone();
        self.description = spec.description.clone();
        self.plan = spec.plan.clone();
    }
}
