//! cloudcontrol-provisioner
//!
//! Lifecycle management for CloudControl network domains. Deploy and delete
//! are asynchronous on the remote side; this crate submits the change, polls
//! until the domain reaches a terminal state and keeps a local record of it.
//!
//! Public API:
//! - `NetworkDomainController`: create / read / update / delete one domain
//! - `poller::await_transition`: bounded polling primitive behind create and delete
//! - `refresh()` / `plan()` / `execute()`: reconcile declared domains against state
//! - `provision()`: convenience: load → refresh → plan → execute
//! - `destroy()`: tear down all managed domains

pub mod error;
pub mod intent;
pub mod lifecycle;
pub mod orchestrate;
pub mod persistence;
pub mod plan;
pub mod poller;
pub mod spec;
pub mod state;

use std::collections::BTreeMap;

pub use crate::error::ProvisionerError;
pub use crate::intent::UpdateIntent;
pub use crate::lifecycle::{LifecycleSettings, NetworkDomainController};
pub use crate::orchestrate::{destroy_all, execute, plan, refresh};
pub use crate::persistence::StatePersistence;
pub use crate::plan::{Action, FieldDrift, PlanEntry};
pub use crate::spec::NetworkDomainSpec;
pub use crate::state::{NetworkDomainState, ProvisionerState};

/// Full provisioning: refresh → plan → execute.
///
/// Returns the plan that was executed.
pub async fn provision(
    controller: &NetworkDomainController,
    desired: &BTreeMap<String, NetworkDomainSpec>,
    persistence: &StatePersistence,
) -> Result<Vec<PlanEntry>, ProvisionerError> {
    for spec in desired.values() {
        spec.validate()?;
    }

    let mut state = persistence.load().await?;
    orchestrate::refresh(controller, &mut state).await?;
    persistence.flush(&state).await?;

    let entries = orchestrate::plan(desired, &state);

    if plan::has_changes(&entries) {
        tracing::info!(
            creates = count(&entries, Action::Create),
            modifies = count(&entries, Action::Modify),
            replaces = count(&entries, Action::Replace),
            deletes = count(&entries, Action::Delete),
            "executing provisioning plan"
        );
        orchestrate::execute(&entries, controller, &mut state, persistence).await?;
    } else {
        tracing::info!("all network domains in sync, no changes needed");
    }

    Ok(entries)
}

/// Destroy all managed network domains.
pub async fn destroy(
    controller: &NetworkDomainController,
    persistence: &StatePersistence,
) -> Result<(), ProvisionerError> {
    let mut state = persistence.load().await?;
    orchestrate::destroy_all(controller, &mut state, persistence).await
}

fn count(entries: &[PlanEntry], action: Action) -> usize {
    entries.iter().filter(|e| e.action == action).count()
}
