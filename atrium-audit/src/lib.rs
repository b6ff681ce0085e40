//! # Atrium Audit
//!
//! This crate provides the authorization audit pipeline for the Atrium
//! HR platform: the decision record type, a buffered batching emitter,
//! and the seam a durable audit store plugs into.
//!
//! ## Overview
//!
//! The atrium-audit crate handles:
//! - **Entries**: One [`AuditEntry`] per authorization decision
//! - **Emitter**: Thread-safe FIFO buffering with threshold-based
//!   batch flushing
//! - **Sinks**: The [`AuditSink`] trait for durable stores, plus an
//!   in-memory implementation
//! - **Delivery**: Bounded exponential-backoff retry; failed batches
//!   are re-queued, never dropped silently
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use atrium_audit::{AccessReason, AuditEmitter, AuditEntry, Decision, MemoryAuditSink};
//! use atrium_rbac::{Action, Resource};
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let sink = Arc::new(MemoryAuditSink::new());
//! let emitter = AuditEmitter::new(sink.clone());
//!
//! let entry = AuditEntry::new(
//!     Uuid::now_v7(),
//!     Resource::Employees,
//!     Action::Read,
//!     Decision::Allowed,
//! )
//! .with_reason(AccessReason::DirectPermission);
//!
//! emitter.record(entry);
//! emitter.flush().await.unwrap();
//! assert_eq!(sink.entries().len(), 1);
//! # }
//! ```
//!
//! ## Ordering and loss guarantees
//!
//! Entries flush in the order recorded. At most one flush is in flight
//! at a time; a flush requested while another runs is a no-op. A batch
//! the sink rejects after retries is restored to the front of the queue
//! and the failure is logged — audit entries are never lost without the
//! loss being surfaced.

pub mod backoff;
pub mod emitter;
pub mod entry;
pub mod sink;

// Re-export main types for convenience
pub use backoff::RetryPolicy;
pub use emitter::{AuditConfig, AuditEmitter, AuditStats};
pub use entry::{AccessReason, AuditEntry, Decision};
pub use sink::{AuditError, AuditResult, AuditSink, MemoryAuditSink};
