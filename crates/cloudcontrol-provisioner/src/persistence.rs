use std::path::PathBuf;

use crate::error::ProvisionerError;
use crate::state::ProvisionerState;

/// Local JSON state file.
pub struct StatePersistence {
    pub path: PathBuf,
}

impl StatePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write state atomically: tmp file + rename.
    pub async fn flush(&self, state: &ProvisionerState) -> Result<(), ProvisionerError> {
        let json = serde_json::to_vec_pretty(state)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            resources = state.resources.len(),
            "state flushed"
        );
        Ok(())
    }

    /// Load state, or return the empty state if no file exists yet.
    pub async fn load(&self) -> Result<ProvisionerState, ProvisionerError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no existing state found, starting fresh");
            return Ok(ProvisionerState::default());
        }

        let json = std::fs::read(&self.path)?;
        let state: ProvisionerState = serde_json::from_slice(&json)?;
        tracing::debug!(
            path = %self.path.display(),
            resources = state.resources.len(),
            "state loaded"
        );
        Ok(state)
    }
}
