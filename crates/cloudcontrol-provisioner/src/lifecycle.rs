use std::sync::Arc;
use std::time::Duration;

use cloudcontrol_compute::network_domain::{STATUS_PENDING_ADD, STATUS_PENDING_DELETE};
use cloudcontrol_compute::{ComputeClient, DomainStatus, NetworkDomain};

use crate::error::{Operation, ProvisionerError};
use crate::intent::UpdateIntent;
use crate::poller::{self, Outcome, Phase, PollTarget};
use crate::spec::NetworkDomainSpec;
use crate::state::NetworkDomainState;

pub const RESOURCE_KIND: &str = "network domain";

/// Deadlines and poll cadence for the asynchronous operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    pub create_timeout: Duration,
    pub create_interval: Duration,
    pub delete_timeout: Duration,
    pub delete_interval: Duration,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            create_timeout: Duration::from_secs(2 * 60),
            create_interval: Duration::from_secs(2),
            delete_timeout: Duration::from_secs(2 * 60),
            delete_interval: Duration::from_secs(5),
        }
    }
}

/// Provisioning is done once the domain reports `NORMAL`.
pub fn classify_provisioned(observed: Option<NetworkDomain>) -> Outcome<NetworkDomain> {
    match observed {
        None => Outcome::Missing,
        Some(domain) => match domain.status() {
            DomainStatus::PendingAdd => Outcome::Pending,
            DomainStatus::Normal => Outcome::Success(domain),
            other => Outcome::Unexpected(other.to_string()),
        },
    }
}

/// Deletion is done once the domain can no longer be found.
pub fn classify_deleted(observed: Option<NetworkDomain>) -> Outcome<()> {
    match observed {
        None => Outcome::Success(()),
        Some(domain) => match domain.status() {
            DomainStatus::PendingDelete => Outcome::Pending,
            other => Outcome::Unexpected(other.to_string()),
        },
    }
}

/// Drives create, read, update and delete for network domains.
///
/// One operation per domain at a time; callers serialize access per id.
pub struct NetworkDomainController {
    client: Arc<dyn ComputeClient>,
    settings: LifecycleSettings,
}

impl NetworkDomainController {
    pub fn new(client: Arc<dyn ComputeClient>) -> Self {
        Self::with_settings(client, LifecycleSettings::default())
    }

    pub fn with_settings(client: Arc<dyn ComputeClient>, settings: LifecycleSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Deploy a network domain and wait until it is `NORMAL`.
    ///
    /// Any failure after the deploy call leaves the remote domain in an
    /// unknown state; the returned error names its id.
    pub async fn create(
        &self,
        spec: &NetworkDomainSpec,
    ) -> Result<NetworkDomainState, ProvisionerError> {
        spec.validate()?;

        tracing::info!(
            name = %spec.name,
            datacenter = %spec.datacenter_id,
            plan = %spec.plan,
            description = %spec.description,
            "creating network domain"
        );

        let id = self
            .client
            .deploy_network_domain(&spec.deploy_request())
            .await
            .map_err(ProvisionerError::remote(Operation::Deploy))?;

        let mut state = NetworkDomainState::deployed(id, spec);
        tracing::info!(id = %state.id, "network domain is being provisioned");

        let target = PollTarget {
            resource: RESOURCE_KIND,
            phase: Phase::Provisioning,
            id: &state.id,
            name: &spec.name,
            in_progress: STATUS_PENDING_ADD,
            timeout: self.settings.create_timeout,
            interval: self.settings.create_interval,
        };
        let client = &self.client;
        let id = state.id.as_str();
        let domain = poller::await_transition(
            &target,
            move || client.get_network_domain(id),
            classify_provisioned,
        )
        .await?;

        state.nat_ipv4_address = domain.nat_ipv4_address;
        Ok(state)
    }

    /// Fetch the current state of a domain.
    ///
    /// `Ok(None)` means the domain no longer exists and the local record
    /// should be dropped.
    pub async fn read(&self, id: &str) -> Result<Option<NetworkDomainState>, ProvisionerError> {
        tracing::debug!(id = %id, "reading network domain");

        let observed = self
            .client
            .get_network_domain(id)
            .await
            .map_err(ProvisionerError::remote(Operation::Get))?;

        match observed {
            Some(domain) => Ok(Some(NetworkDomainState::from_observed(&domain))),
            None => {
                tracing::info!(id = %id, "network domain no longer exists");
                Ok(None)
            }
        }
    }

    /// Send the fields of `desired` that differ from `previous`.
    ///
    /// Edits take effect synchronously; nothing is polled. Returns the intent
    /// that was sent, which is empty when nothing changed.
    pub async fn update(
        &self,
        id: &str,
        desired: &NetworkDomainSpec,
        previous: &NetworkDomainSpec,
    ) -> Result<UpdateIntent, ProvisionerError> {
        if desired.datacenter_id != previous.datacenter_id {
            return Err(ProvisionerError::ReplacementRequired {
                id: id.to_string(),
                field: "datacenter",
            });
        }

        let intent = UpdateIntent::diff(previous, desired);
        if intent.is_empty() {
            tracing::debug!(id = %id, "network domain unchanged, skipping edit");
            return Ok(intent);
        }

        tracing::info!(
            id = %id,
            name = ?intent.name.as_set(),
            description = ?intent.description.as_set(),
            plan = ?intent.plan.as_set(),
            "updating network domain"
        );

        let edit = intent.clone().into_edit(id);
        self.client
            .edit_network_domain(&edit)
            .await
            .map_err(ProvisionerError::remote(Operation::Edit))?;

        Ok(intent)
    }

    /// Delete a domain and wait until it can no longer be found.
    pub async fn delete(
        &self,
        id: &str,
        name: &str,
        datacenter_id: &str,
    ) -> Result<(), ProvisionerError> {
        tracing::info!(
            id = %id,
            name = %name,
            datacenter = %datacenter_id,
            "deleting network domain"
        );

        self.client
            .delete_network_domain(id)
            .await
            .map_err(ProvisionerError::remote(Operation::Delete))?;

        tracing::info!(id = %id, "network domain is being deleted");

        let target = PollTarget {
            resource: RESOURCE_KIND,
            phase: Phase::Deletion,
            id,
            name,
            in_progress: STATUS_PENDING_DELETE,
            timeout: self.settings.delete_timeout,
            interval: self.settings.delete_interval,
        };
        let client = &self.client;
        poller::await_transition(
            &target,
            move || client.get_network_domain(id),
            classify_deleted,
        )
        .await
    }
}
