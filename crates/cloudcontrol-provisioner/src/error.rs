use std::fmt;
use std::time::Duration;

use cloudcontrol_compute::ComputeError;
use thiserror::Error;

use crate::poller::Phase;

/// The compute API call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deploy,
    Get,
    Edit,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deploy => "deploy",
            Self::Get => "get",
            Self::Edit => "edit",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum ProvisionerError {
    /// The call that starts or applies a change failed. The message is the
    /// client error unchanged.
    #[error("{source}")]
    RemoteCall {
        operation: Operation,
        #[source]
        source: ComputeError,
    },

    #[error("failed to poll status of {resource} '{id}': {source}")]
    PollQuery {
        resource: &'static str,
        id: String,
        #[source]
        source: ComputeError,
    },

    #[error(
        "{phase} of {resource} '{id}' ('{name}') failed: encountered unexpected state '{status}'"
    )]
    UnexpectedState {
        resource: &'static str,
        phase: Phase,
        id: String,
        name: String,
        status: String,
    },

    #[error("{resource} was not found with id '{id}' during {phase}")]
    NotFound {
        resource: &'static str,
        phase: Phase,
        id: String,
    },

    #[error("timed out after waiting {timeout:?} for {phase} of {resource} '{id}' to complete")]
    Timeout {
        resource: &'static str,
        phase: Phase,
        id: String,
        timeout: Duration,
    },

    #[error("invalid network domain spec: {0}")]
    InvalidSpec(String),

    #[error(
        "{field} of network domain '{id}' cannot be changed in place; the domain must be replaced"
    )]
    ReplacementRequired { id: String, field: &'static str },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionerError {
    pub(crate) fn remote(operation: Operation) -> impl FnOnce(ComputeError) -> Self {
        move |source| Self::RemoteCall { operation, source }
    }
}
