//! Pacing: fixed pauses after each attempted record to stay under the service's rate limit.
//!
//! The policy is static. It does not read rate-limit headers, does not back off, and
//! treats every failure kind the same.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Result of one attempted record, as far as pacing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause after a successful generation
    #[serde(default = "default_success_delay_secs")]
    pub success_delay_secs: u64,

    /// Pause after a failed generation
    #[serde(default = "default_failure_delay_secs")]
    pub failure_delay_secs: u64,
}

fn default_success_delay_secs() -> u64 {
    35
}

fn default_failure_delay_secs() -> u64 {
    10
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            success_delay_secs: default_success_delay_secs(),
            failure_delay_secs: default_failure_delay_secs(),
        }
    }
}

/// Suspends the batch between attempts.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, outcome: AttemptOutcome);
}

/// Sleeps a fixed duration chosen only by success or failure.
#[derive(Debug, Clone)]
pub struct FixedPacer {
    success_delay: Duration,
    failure_delay: Duration,
}

impl FixedPacer {
    pub fn new(success_delay: Duration, failure_delay: Duration) -> Self {
        Self {
            success_delay,
            failure_delay,
        }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(
            Duration::from_secs(config.success_delay_secs),
            Duration::from_secs(config.failure_delay_secs),
        )
    }

    pub fn delay_for(&self, outcome: AttemptOutcome) -> Duration {
        match outcome {
            AttemptOutcome::Success => self.success_delay,
            AttemptOutcome::Failure => self.failure_delay,
        }
    }
}

#[async_trait]
impl Pacer for FixedPacer {
    async fn pause(&self, outcome: AttemptOutcome) {
        let delay = self.delay_for(outcome);
        if delay.is_zero() {
            return;
        }
        debug!(?outcome, delay_secs = delay.as_secs_f64(), "Pacing");
        tokio::time::sleep(delay).await;
    }
}
