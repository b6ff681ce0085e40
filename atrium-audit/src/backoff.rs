//! Bounded retry for audit delivery.
//!
//! Sink outages are usually transient; a short exponential backoff
//! clears most of them without the emitter giving up and re-queueing.

use std::time::Duration;
use tokio::time::sleep;

use crate::sink::{AuditResult, AuditSink};
use crate::entry::AuditEntry;

/// Retry policy for handing a batch to the sink.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_backoff: Duration,

    /// Ceiling on the doubled delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay to wait after the given 1-based failed attempt.
    fn backoff_after(&self, attempt: u32) -> Duration {
        let doubled = self
            .initial_backoff
            .saturating_mul(1u32 << (attempt - 1).min(16));
        doubled.min(self.max_backoff)
    }
}

/// Hand a batch to the sink, retrying per the policy.
///
/// Returns the sink's last error once attempts are exhausted; the caller
/// (the emitter) re-queues the batch in that case, so no entry is lost.
pub async fn deliver_with_retry(
    policy: &RetryPolicy,
    sink: &dyn AuditSink,
    batch: &[AuditEntry],
) -> AuditResult<()> {
    let mut attempt = 0;

    loop {
        attempt += 1;

        match sink.write(batch).await {
            Ok(()) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "audit batch delivered after retry");
                }
                return Ok(());
            }
            Err(e) if attempt >= policy.max_attempts.max(1) => {
                tracing::error!(
                    attempts = attempt,
                    entries = batch.len(),
                    error = %e,
                    "audit delivery attempts exhausted"
                );
                return Err(e);
            }
            Err(e) => {
                let delay = policy.backoff_after(attempt);
                tracing::warn!(
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "audit delivery failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}
