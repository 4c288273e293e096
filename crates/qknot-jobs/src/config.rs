//! Job manager configuration.

use std::time::Duration;

use qknot_hal::{DEFAULT_CHANNEL_CANDIDATES, DEFAULT_MIN_QUBITS};

use crate::error::{JobError, JobResult};

/// Upper bound on shots per submission.
pub const MAX_SHOTS: u32 = 100_000;

/// Validate a raw shot count.
pub fn check_shots(shots: i64) -> JobResult<u32> {
    match u32::try_from(shots) {
        Ok(n) if (1..=MAX_SHOTS).contains(&n) => Ok(n),
        _ => Err(JobError::InvalidShots {
            shots,
            max: MAX_SHOTS,
        }),
    }
}

/// Caller-side polling budget for [`run`](crate::JobLifecycleManager::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between status reads.
    pub poll_interval: Duration,
    /// Status reads before giving up.
    pub max_polls: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        // 5 minutes.
        Self {
            poll_interval: Duration::from_millis(500),
            max_polls: 600,
        }
    }
}

/// Settings for [`JobLifecycleManager`](crate::JobLifecycleManager).
#[derive(Debug, Clone)]
pub struct JobManagerConfig {
    /// Minimum qubits for least-busy selection.
    pub min_qubits: u32,
    /// Channel candidates for automatic resolution, in order.
    pub channel_candidates: Vec<String>,
    /// Polling budget for blocking runs.
    pub wait: WaitPolicy,
}

impl Default for JobManagerConfig {
    fn default() -> Self {
        Self {
            min_qubits: DEFAULT_MIN_QUBITS,
            channel_candidates: DEFAULT_CHANNEL_CANDIDATES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            wait: WaitPolicy::default(),
        }
    }
}
