//! Audit sink abstraction
//!
//! The durable store behind the audit pipeline is an external
//! collaborator; this module defines the seam it plugs into and an
//! in-memory implementation for single-process use and testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::entry::AuditEntry;

/// Audit pipeline error types.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The durable sink rejected or could not accept a batch
    #[error("audit sink unavailable: {0}")]
    SinkUnavailable(String),

    /// A sink implementation failed to encode entries
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Durable destination for audit batches.
///
/// Implementations must treat a batch as append-only and preserve the
/// order of entries within it. Returning an error tells the emitter the
/// batch was NOT persisted; the emitter will retry and then re-queue, so
/// a sink must not partially apply a batch it reports as failed.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one batch of entries, in order.
    async fn write(&self, batch: &[AuditEntry]) -> AuditResult<()>;
}

/// In-memory audit sink.
///
/// Suitable for tests and single-process applications. Records every
/// batch it receives and can be switched into a failing mode to exercise
/// retry and re-queue behavior.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    /// Batches received, in write order.
    batches: Mutex<Vec<Vec<AuditEntry>>>,
    /// When set, every write fails.
    failing: AtomicBool,
}

impl MemoryAuditSink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch induced failure on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.batches.lock().len()
    }

    /// All batches received so far.
    pub fn batches(&self) -> Vec<Vec<AuditEntry>> {
        self.batches.lock().clone()
    }

    /// All entries received so far, flattened in write order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.batches.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn write(&self, batch: &[AuditEntry]) -> AuditResult<()> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(AuditError::SinkUnavailable("induced failure".to_string()));
        }
        self.batches.lock().push(batch.to_vec());
        Ok(())
    }
}
