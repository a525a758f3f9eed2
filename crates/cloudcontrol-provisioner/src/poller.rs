//! Bounded polling for asynchronous remote transitions.
//!
//! Deploy and delete calls return as soon as the control plane accepts them.
//! [`await_transition`] then queries the resource on a fixed interval until
//! a classifier reports a terminal outcome or the deadline passes.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use cloudcontrol_compute::error::format_err_chain;
use cloudcontrol_compute::{ComputeError, NetworkDomain};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::ProvisionerError;

/// Which transition is being awaited. Used in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Provisioning,
    Deletion,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Provisioning => "provisioning",
            Self::Deletion => "deletion",
        })
    }
}

/// Anything that reports a raw remote status string.
pub trait Observation {
    fn raw_status(&self) -> &str;
}

impl Observation for NetworkDomain {
    fn raw_status(&self) -> &str {
        &self.state
    }
}

/// Classification of one poll result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Still transitioning; poll again.
    Pending,
    /// Terminal success carrying the final observation.
    Success(T),
    /// The resource vanished where it was expected to exist.
    Missing,
    /// A status outside the expected pair. Carries the raw status.
    Unexpected(String),
}

/// What to poll and for how long.
#[derive(Debug, Clone)]
pub struct PollTarget<'a> {
    /// Resource kind for messages, e.g. "network domain".
    pub resource: &'static str,
    pub phase: Phase,
    pub id: &'a str,
    pub name: &'a str,
    /// Status the resource reports while the transition is under way.
    pub in_progress: &'a str,
    pub timeout: Duration,
    pub interval: Duration,
}

/// Poll `fetch` until `classify` yields a terminal outcome or `target.timeout`
/// elapses.
///
/// The first query happens one interval after the call. An observation whose
/// status equals `target.in_progress` is pending without consulting
/// `classify`. Fetch errors abort immediately; nothing is retried.
///
/// Both timers live in this future and are dropped on every return path.
pub async fn await_transition<S, T, F, Fut, C>(
    target: &PollTarget<'_>,
    mut fetch: F,
    classify: C,
) -> Result<T, ProvisionerError>
where
    S: Observation,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<S>, ComputeError>>,
    C: Fn(Option<S>) -> Outcome<T>,
{
    if target.interval.is_zero() {
        return Err(ProvisionerError::InvalidSettings(format!(
            "{} poll interval must be non-zero",
            target.phase
        )));
    }

    let start = Instant::now();
    let deadline_at = start + target.timeout;
    let deadline = time::sleep_until(deadline_at);
    tokio::pin!(deadline);

    let mut ticker = time::interval_at(start + target.interval, target.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let timed_out = || ProvisionerError::Timeout {
        resource: target.resource,
        phase: target.phase,
        id: target.id.to_string(),
        timeout: target.timeout,
    };

    loop {
        // A tick that lands on the deadline is still served.
        tokio::select! {
            biased;
            _ = ticker.tick() => {}
            _ = &mut deadline => return Err(timed_out()),
        }

        tracing::debug!(resource = target.resource, id = %target.id, "polling status");

        let observed = fetch().await.map_err(|source| {
            tracing::warn!(
                resource = target.resource,
                id = %target.id,
                error = %format_err_chain(&source),
                "status query failed"
            );
            ProvisionerError::PollQuery {
                resource: target.resource,
                id: target.id.to_string(),
                source,
            }
        })?;

        let outcome = match observed {
            Some(ref obs) if obs.raw_status() == target.in_progress => Outcome::Pending,
            other => classify(other),
        };

        match outcome {
            Outcome::Pending => {
                tracing::debug!(
                    resource = target.resource,
                    id = %target.id,
                    phase = %target.phase,
                    "still in progress"
                );
                if Instant::now() >= deadline_at {
                    return Err(timed_out());
                }
            }
            Outcome::Success(value) => {
                tracing::info!(
                    resource = target.resource,
                    id = %target.id,
                    phase = %target.phase,
                    elapsed = ?start.elapsed(),
                    "transition complete"
                );
                return Ok(value);
            }
            Outcome::Missing => {
                return Err(ProvisionerError::NotFound {
                    resource: target.resource,
                    phase: target.phase,
                    id: target.id.to_string(),
                });
            }
            Outcome::Unexpected(status) => {
                tracing::warn!(
                    resource = target.resource,
                    id = %target.id,
                    status = %status,
                    "unexpected status"
                );
                return Err(ProvisionerError::UnexpectedState {
                    resource: target.resource,
                    phase: target.phase,
                    id: target.id.to_string(),
                    name: target.name.to_string(),
                    status,
                });
            }
        }
    }
}
