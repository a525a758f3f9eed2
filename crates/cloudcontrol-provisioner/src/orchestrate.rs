use std::collections::BTreeMap;

use crate::error::ProvisionerError;
use crate::lifecycle::NetworkDomainController;
use crate::persistence::StatePersistence;
use crate::plan::{field_drift, Action, PlanEntry};
use crate::spec::NetworkDomainSpec;
use crate::state::ProvisionerState;

/// Re-read every domain in state from the compute API.
///
/// Records whose domain no longer exists are dropped; the rest are
/// overwritten with what the API reports. Returns the dropped labels.
pub async fn refresh(
    controller: &NetworkDomainController,
    state: &mut ProvisionerState,
) -> Result<Vec<String>, ProvisionerError> {
    let mut dropped = Vec::new();
    let labels: Vec<String> = state.resources.keys().cloned().collect();

    for label in labels {
        let Some(id) = state.resources.get(&label).map(|rs| rs.id.clone()) else {
            continue;
        };

        match controller.read(&id).await? {
            Some(observed) => {
                state.resources.insert(label, observed);
            }
            None => {
                tracing::warn!(label = %label, id = %id, "network domain deleted out of band");
                state.resources.remove(&label);
                dropped.push(label);
            }
        }
    }

    Ok(dropped)
}

/// Compare declared domains against (refreshed) state.
///
/// One entry per declared label in label order, plus a `Delete` entry for
/// every label in state that is no longer declared.
pub fn plan(
    desired: &BTreeMap<String, NetworkDomainSpec>,
    state: &ProvisionerState,
) -> Vec<PlanEntry> {
    let mut entries = Vec::with_capacity(desired.len());

    for (label, spec) in desired {
        let entry = match state.resources.get(label) {
            None => PlanEntry {
                label: label.clone(),
                action: Action::Create,
                id: None,
                desired: Some(spec.clone()),
                drift: vec![],
            },
            Some(record) => {
                let drift = field_drift(&record.spec(), spec);
                let action = if record.datacenter_id != spec.datacenter_id {
                    Action::Replace
                } else if drift.is_empty() {
                    Action::Ok
                } else {
                    Action::Modify
                };
                PlanEntry {
                    label: label.clone(),
                    action,
                    id: Some(record.id.clone()),
                    desired: Some(spec.clone()),
                    drift,
                }
            }
        };
        entries.push(entry);
    }

    // Orphans: in state but no longer declared
    for (label, record) in &state.resources {
        if !desired.contains_key(label) {
            entries.push(PlanEntry {
                label: label.clone(),
                action: Action::Delete,
                id: Some(record.id.clone()),
                desired: None,
                drift: vec![],
            });
        }
    }

    entries
}

/// Execute all actionable entries in the plan.
///
/// Creates, then modifies, then replacements (delete before create), then
/// orphan deletes in reverse order. State is flushed after every action so a
/// failure part-way leaves an accurate record of what was done.
pub async fn execute(
    entries: &[PlanEntry],
    controller: &NetworkDomainController,
    state: &mut ProvisionerState,
    persistence: &StatePersistence,
) -> Result<(), ProvisionerError> {
    for entry in entries.iter().filter(|e| e.action == Action::Create) {
        let spec = desired_spec(entry)?;
        tracing::info!(label = %entry.label, "creating network domain");
        let created = controller.create(spec).await?;
        state.resources.insert(entry.label.clone(), created);
        persistence.flush(state).await?;
    }

    for entry in entries.iter().filter(|e| e.action == Action::Modify) {
        let spec = desired_spec(entry)?;
        let Some(record) = state.resources.get_mut(&entry.label) else {
            continue;
        };
        tracing::info!(label = %entry.label, id = %record.id, "modifying network domain");
        let previous = record.spec();
        controller.update(&record.id, spec, &previous).await?;
        record.apply(spec);
        persistence.flush(state).await?;
    }

    for entry in entries.iter().filter(|e| e.action == Action::Replace) {
        let spec = desired_spec(entry)?;
        if let Some(record) = state.resources.get(&entry.label) {
            tracing::info!(label = %entry.label, id = %record.id, "replacing network domain");
            controller
                .delete(&record.id, &record.name, &record.datacenter_id)
                .await?;
            state.resources.remove(&entry.label);
            persistence.flush(state).await?;
        }
        let created = controller.create(spec).await?;
        state.resources.insert(entry.label.clone(), created);
        persistence.flush(state).await?;
    }

    for entry in entries
        .iter()
        .filter(|e| e.action == Action::Delete)
        .rev()
    {
        if let Some(record) = state.resources.get(&entry.label) {
            tracing::info!(
                label = %entry.label,
                id = %record.id,
                "destroying orphaned network domain"
            );
            controller
                .delete(&record.id, &record.name, &record.datacenter_id)
                .await?;
        }
        state.resources.remove(&entry.label);
        persistence.flush(state).await?;
    }

    Ok(())
}

/// Delete every domain in state, last label first.
pub async fn destroy_all(
    controller: &NetworkDomainController,
    state: &mut ProvisionerState,
    persistence: &StatePersistence,
) -> Result<(), ProvisionerError> {
    let labels: Vec<String> = state.resources.keys().rev().cloned().collect();

    for label in labels {
        if let Some(record) = state.resources.get(&label) {
            tracing::info!(label = %label, id = %record.id, "destroying network domain");
            controller
                .delete(&record.id, &record.name, &record.datacenter_id)
                .await?;
        }
        state.resources.remove(&label);
        persistence.flush(state).await?;
    }

    Ok(())
}

fn desired_spec(entry: &PlanEntry) -> Result<&NetworkDomainSpec, ProvisionerError> {
    entry.desired.as_ref().ok_or_else(|| {
        ProvisionerError::InvalidSpec(format!("plan entry '{}' has no desired spec", entry.label))
    })
}
