use cloudcontrol_compute::DeployNetworkDomain;
use serde::{Deserialize, Serialize};

use crate::error::ProvisionerError;

pub const DEFAULT_PLAN: &str = "ESSENTIALS";

/// Desired configuration of a network domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDomainSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_plan")]
    pub plan: String,
    /// Fixed at creation. Changing it means replacing the domain.
    #[serde(rename = "datacenter")]
    pub datacenter_id: String,
}

fn default_plan() -> String {
    DEFAULT_PLAN.to_string()
}

impl NetworkDomainSpec {
    pub fn new(name: impl Into<String>, datacenter_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            plan: default_plan(),
            datacenter_id: datacenter_id.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    pub fn validate(&self) -> Result<(), ProvisionerError> {
        if self.name.trim().is_empty() {
            return Err(ProvisionerError::InvalidSpec("name is required".into()));
        }
        if self.datacenter_id.trim().is_empty() {
            return Err(ProvisionerError::InvalidSpec(format!(
                "datacenter is required for '{}'",
                self.name
            )));
        }
        Ok(())
    }

    pub(crate) fn deploy_request(&self) -> DeployNetworkDomain {
        DeployNetworkDomain {
            name: self.name.clone(),
            description: self.description.clone(),
            plan: self.plan.clone(),
            datacenter_id: self.datacenter_id.clone(),
        }
    }
}
