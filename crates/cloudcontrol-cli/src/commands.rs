use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use cloudcontrol_compute::HttpComputeClient;
use cloudcontrol_provisioner::{
    Action, NetworkDomainController, PlanEntry, ProvisionerState, StatePersistence,
};

use crate::config::{redact_username, CloudControlConfig};

/// Everything a subcommand needs, built once from the config file.
pub struct Context {
    pub config: CloudControlConfig,
    pub controller: NetworkDomainController,
    pub persistence: StatePersistence,
}

impl Context {
    pub fn from_config(config: CloudControlConfig, config_path: &Path) -> eyre::Result<Self> {
        let (username, password) = config
            .credentials
            .resolve(|name| std::env::var(name).ok())?;
        let settings = config.timeouts.lifecycle_settings()?;
        let base_url = config.base_url();

        tracing::info!(
            endpoint = %base_url,
            organization_id = %config.organization_id,
            username = %redact_username(&username),
            "connecting to compute API"
        );

        let client = HttpComputeClient::new(
            base_url,
            config.organization_id.clone(),
            username,
            password,
            config.timeouts.request_timeout(),
        )?;
        let controller = NetworkDomainController::with_settings(Arc::new(client), settings);
        tracing::debug!(settings = ?controller.settings(), "lifecycle settings");
        let persistence = StatePersistence::new(config.state_path(config_path));

        Ok(Self {
            config,
            controller,
            persistence,
        })
    }
}

/// Refresh state and print what `apply` would do. Nothing is written.
pub async fn plan(ctx: &Context) -> eyre::Result<()> {
    for spec in ctx.config.network_domains.values() {
        spec.validate()?;
    }

    let mut state = ctx.persistence.load().await?;
    cloudcontrol_provisioner::refresh(&ctx.controller, &mut state).await?;
    let entries = cloudcontrol_provisioner::plan(&ctx.config.network_domains, &state);

    print!("{}", render_plan(&entries));
    Ok(())
}

pub async fn apply(ctx: &Context) -> eyre::Result<()> {
    let entries = cloudcontrol_provisioner::provision(
        &ctx.controller,
        &ctx.config.network_domains,
        &ctx.persistence,
    )
    .await?;

    print!("{}", render_plan(&entries));
    let state = ctx.persistence.load().await?;
    print!("{}", render_state(&state));
    Ok(())
}

pub async fn refresh(ctx: &Context) -> eyre::Result<()> {
    let mut state = ctx.persistence.load().await?;
    let dropped = cloudcontrol_provisioner::refresh(&ctx.controller, &mut state).await?;
    ctx.persistence.flush(&state).await?;

    for label in &dropped {
        println!("- {label} (no longer exists, removed from state)");
    }
    print!("{}", render_state(&state));
    Ok(())
}

pub async fn show(persistence: &StatePersistence) -> eyre::Result<()> {
    let state = persistence.load().await?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

pub async fn destroy(ctx: &Context) -> eyre::Result<()> {
    let state = ctx.persistence.load().await?;
    if state.resources.is_empty() {
        println!("Nothing to destroy.");
        return Ok(());
    }

    let count = state.resources.len();
    cloudcontrol_provisioner::destroy(&ctx.controller, &ctx.persistence).await?;
    println!("Destroyed {count} network domain(s).");
    Ok(())
}

fn symbol(action: Action) -> char {
    match action {
        Action::Ok => ' ',
        Action::Create => '+',
        Action::Modify => '~',
        Action::Replace => '!',
        Action::Delete => '-',
    }
}

fn verb(action: Action) -> &'static str {
    match action {
        Action::Ok => "in sync",
        Action::Create => "create",
        Action::Modify => "modify",
        Action::Replace => "replace",
        Action::Delete => "delete",
    }
}

/// Human-readable plan, one line per label plus one line per drifted field.
pub fn render_plan(entries: &[PlanEntry]) -> String {
    let mut out = String::new();
    if entries.is_empty() {
        out.push_str("No network domains declared.\n");
        return out;
    }

    for entry in entries {
        let id = entry.id.as_deref().unwrap_or("(new)");
        let _ = writeln!(
            out,
            "{} {} {} ({})",
            symbol(entry.action),
            entry.label,
            id,
            verb(entry.action)
        );
        for drift in &entry.drift {
            let _ = writeln!(
                out,
                "    {}: {:?} -> {:?}",
                drift.field, drift.actual, drift.expected
            );
        }
    }

    let pending = entries.iter().filter(|e| e.is_actionable()).count();
    if pending == 0 {
        out.push_str("No changes.\n");
    } else {
        let _ = writeln!(out, "{pending} change(s).");
    }
    out
}

pub fn render_state(state: &ProvisionerState) -> String {
    let mut out = String::new();
    for (label, record) in &state.resources {
        let nat = if record.nat_ipv4_address.is_empty() {
            "-"
        } else {
            record.nat_ipv4_address.as_str()
        };
        let _ = writeln!(
            out,
            "{label}\t{}\t{}\t{}\t{}\tNAT {nat}",
            record.id, record.name, record.plan, record.datacenter_id
        );
    }
    out
}
