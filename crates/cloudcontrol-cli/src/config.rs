use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cloudcontrol_compute::http::region_endpoint;
use cloudcontrol_provisioner::{LifecycleSettings, NetworkDomainSpec};
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const USERNAME_VAR: &str = "CLOUDCONTROL_USERNAME";
pub const PASSWORD_VAR: &str = "CLOUDCONTROL_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudControlConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Region code, e.g. "NA". Selects the public API endpoint.
    pub region: String,
    /// Overrides the endpoint derived from `region`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub organization_id: String,
    pub credentials: CredentialSource,
    /// State file location. Relative paths resolve against the config file's
    /// directory; defaults to `state.json` next to the config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
    #[serde(default)]
    pub timeouts: Timeouts,
    /// Declared network domains, keyed by label.
    #[serde(default)]
    pub network_domains: BTreeMap<String, NetworkDomainSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline { username: String, password: String },
    /// Read from `CLOUDCONTROL_USERNAME` / `CLOUDCONTROL_PASSWORD`.
    Environment,
}

impl CredentialSource {
    /// Resolve to a `(username, password)` pair.
    ///
    /// `lookup` reads an environment variable; the binary passes
    /// `std::env::var(..).ok()`.
    pub fn resolve(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> eyre::Result<(String, String)> {
        match self {
            CredentialSource::Inline { username, password } => {
                Ok((username.clone(), password.clone()))
            }
            CredentialSource::Environment => {
                let username = lookup(USERNAME_VAR)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| eyre::eyre!("{USERNAME_VAR} is not set"))?;
                let password = lookup(PASSWORD_VAR)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| eyre::eyre!("{PASSWORD_VAR} is not set"))?;
                Ok((username, password))
            }
        }
    }
}

/// Deadlines and poll intervals, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub create_timeout: u64,
    pub create_interval: u64,
    pub delete_timeout: u64,
    pub delete_interval: u64,
    pub request_timeout: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        let lifecycle = LifecycleSettings::default();
        Self {
            create_timeout: lifecycle.create_timeout.as_secs(),
            create_interval: lifecycle.create_interval.as_secs(),
            delete_timeout: lifecycle.delete_timeout.as_secs(),
            delete_interval: lifecycle.delete_interval.as_secs(),
            request_timeout: 60,
        }
    }
}

impl Timeouts {
    pub fn lifecycle_settings(&self) -> eyre::Result<LifecycleSettings> {
        if self.create_interval == 0 || self.delete_interval == 0 {
            return Err(eyre::eyre!("poll intervals must be at least one second"));
        }
        Ok(LifecycleSettings {
            create_timeout: Duration::from_secs(self.create_timeout),
            create_interval: Duration::from_secs(self.create_interval),
            delete_timeout: Duration::from_secs(self.delete_timeout),
            delete_interval: Duration::from_secs(self.delete_interval),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl CloudControlConfig {
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => region_endpoint(&self.region),
        }
    }

    /// Where the state file lives for a config loaded from `config_path`.
    pub fn state_path(&self, config_path: &Path) -> PathBuf {
        let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        match &self.state_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => dir.join(path),
            None => dir.join("state.json"),
        }
    }
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("cloudcontrol").join("config.json"))
}

pub fn load_config(path: &Path) -> eyre::Result<CloudControlConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse_config(&contents)?;
    tracing::debug!(
        path = %path.display(),
        domains = config.network_domains.len(),
        "config loaded"
    );
    Ok(config)
}

pub fn parse_config(contents: &str) -> eyre::Result<CloudControlConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let migrated = migrate(json, on_disk_version)?;
    let config: CloudControlConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update cloudcontrol."
        ));
    }

    // v0 → v1: declared domains moved from `domains` to `network_domains`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(domains) = obj.remove("domains") {
            obj.entry("network_domains").or_insert(domains);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed domains to network_domains)");
    }

    Ok(json)
}

/// Username with all but the first two characters masked.
pub fn redact_username(username: &str) -> String {
    let visible: String = username.chars().take(2).collect();
    format!("{visible}****")
}
