//! Buffered audit emitter
//!
//! Every authorization decision is recorded here before the check
//! returns. `record` is a synchronous in-memory append so the check path
//! never waits on the durable sink; batches drain on an explicit
//! `flush` or once the queue reaches the configured threshold.
//!
//! Guarantees:
//! - entries flush in the order they were recorded (FIFO),
//! - at most one drain is in flight at a time (a concurrent flush
//!   request is a no-op),
//! - a batch the sink rejects is re-queued at the front, so entries are
//!   never dropped without the failure being surfaced.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backoff::{deliver_with_retry, RetryPolicy};
use crate::entry::AuditEntry;
use crate::sink::{AuditResult, AuditSink};

/// Configuration for the audit emitter.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Queue size that triggers a flush (default: 100).
    pub flush_threshold: usize,

    /// Retry policy for sink delivery.
    pub retry: RetryPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            flush_threshold: 100,
            retry: RetryPolicy::default(),
        }
    }
}

/// Audit pipeline statistics.
#[derive(Debug, Clone, Default)]
pub struct AuditStats {
    /// Total entries recorded.
    pub recorded: u64,
    /// Total entries successfully flushed to the sink.
    pub flushed: u64,
    /// Number of flushes that exhausted retries.
    pub flush_failures: u64,
    /// Entries currently queued.
    pub queued: usize,
}

/// Buffered, batching audit emitter.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use atrium_audit::{AuditEmitter, MemoryAuditSink};
///
/// let emitter = AuditEmitter::new(Arc::new(MemoryAuditSink::new()));
/// ```
pub struct AuditEmitter {
    /// Durable destination for drained batches.
    sink: Arc<dyn AuditSink>,
    /// Emitter configuration.
    config: AuditConfig,
    /// FIFO queue of entries awaiting flush.
    queue: Mutex<VecDeque<AuditEntry>>,
    /// Held for the duration of a drain; `try_lock` makes a concurrent
    /// flush a no-op instead of a double-drain.
    draining: tokio::sync::Mutex<()>,
    /// Statistics.
    recorded: AtomicU64,
    flushed: AtomicU64,
    flush_failures: AtomicU64,
}

impl std::fmt::Debug for AuditEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditEmitter")
            .field("config", &self.config)
            .field("queued", &self.queued())
            .finish()
    }
}

impl AuditEmitter {
    /// Create an emitter with the default configuration.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self::with_config(sink, AuditConfig::default())
    }

    /// Create an emitter with a custom configuration.
    pub fn with_config(sink: Arc<dyn AuditSink>, config: AuditConfig) -> Self {
        Self {
            sink,
            config,
            queue: Mutex::new(VecDeque::new()),
            draining: tokio::sync::Mutex::new(()),
            recorded: AtomicU64::new(0),
            flushed: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
        }
    }

    /// Append an entry to the queue.
    ///
    /// Synchronous and non-blocking: no I/O happens here, and the lock
    /// guards only the push. Safe under concurrent callers.
    pub fn record(&self, entry: AuditEntry) {
        self.queue.lock().push_back(entry);
        self.recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Entries currently queued.
    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    /// Flush if the queue has reached the configured threshold.
    ///
    /// Returns the number of entries delivered (0 when below threshold
    /// or when another flush is already in flight).
    pub async fn flush_if_full(&self) -> AuditResult<usize> {
        if self.queued() >= self.config.flush_threshold {
            self.flush().await
        } else {
            Ok(0)
        }
    }

    /// Drain the queue into one batch and hand it to the sink.
    ///
    /// If another drain is in flight this returns `Ok(0)` without
    /// touching the queue. On terminal sink failure the batch is pushed
    /// back to the front of the queue in its original order and
    /// [`AuditError::SinkUnavailable`](crate::sink::AuditError) is
    /// returned; the entries remain for a later flush.
    pub async fn flush(&self) -> AuditResult<usize> {
        let _guard = match self.draining.try_lock() {
            Ok(guard) => guard,
            Err(_) => return Ok(0),
        };

        let batch: Vec<AuditEntry> = {
            let mut queue = self.queue.lock();
            queue.drain(..).collect()
        };
        if batch.is_empty() {
            return Ok(0);
        }

        match deliver_with_retry(&self.config.retry, self.sink.as_ref(), &batch).await {
            Ok(()) => {
                let count = batch.len();
                self.flushed.fetch_add(count as u64, Ordering::Relaxed);
                tracing::debug!(entries = count, "audit batch flushed");
                Ok(count)
            }
            Err(e) => {
                self.flush_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    entries = batch.len(),
                    error = %e,
                    "audit flush failed, re-queueing batch"
                );
                // Entries recorded during the drain sit behind the
                // restored batch, preserving overall FIFO order.
                let mut queue = self.queue.lock();
                for entry in batch.into_iter().rev() {
                    queue.push_front(entry);
                }
                Err(e)
            }
        }
    }

    /// Snapshot of emitter statistics.
    pub fn stats(&self) -> AuditStats {
        AuditStats {
            recorded: self.recorded.load(Ordering::Relaxed),
            flushed: self.flushed.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            queued: self.queued(),
        }
    }
}
