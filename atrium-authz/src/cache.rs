//! Per-user permission cache
//!
//! Process-wide keyed store: one slot per user holding the resolved
//! permission set plus a memoized decision per checked key. Populated
//! lazily on first resolution, invalidated explicitly when assignments
//! change or on logout — never by a timer. Callers needing TTL expiry
//! layer it on top.
//!
//! Locks are `parking_lot` so the synchronous render-thread path can
//! read without an async runtime; critical sections are pointer swaps
//! and map lookups, never I/O.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use atrium_audit::{AccessReason, Decision};
use atrium_rbac::PermissionKey;

use crate::resolver::ResolvedPermissions;

/// One user's cached state.
#[derive(Debug)]
struct CacheSlot {
    /// The resolved permission set.
    resolved: Arc<ResolvedPermissions>,
    /// Memoized decisions keyed by checked permission.
    decisions: HashMap<PermissionKey, (Decision, AccessReason)>,
}

/// Process-wide cache of resolved permissions, keyed by user id.
///
/// Concurrent population for the same user is tolerated: both writers
/// insert a full, self-consistent slot and the last one wins
/// (resolution is idempotent, so the slots are equivalent).
#[derive(Debug, Default)]
pub struct PermissionCache {
    slots: RwLock<HashMap<Uuid, CacheSlot>>,
}

impl PermissionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached resolution for a user, if any.
    pub fn get(&self, user_id: Uuid) -> Option<Arc<ResolvedPermissions>> {
        self.slots
            .read()
            .get(&user_id)
            .map(|slot| slot.resolved.clone())
    }

    /// Store a fresh resolution, replacing any existing slot.
    ///
    /// Replacing the slot also discards the memoized decisions — they
    /// were computed against the old resolution.
    pub fn insert(&self, resolved: ResolvedPermissions) -> Arc<ResolvedPermissions> {
        let resolved = Arc::new(resolved);
        self.slots.write().insert(
            resolved.user_id,
            CacheSlot {
                resolved: resolved.clone(),
                decisions: HashMap::new(),
            },
        );
        resolved
    }

    /// The memoized decision for a key, if one was computed.
    pub fn cached_decision(
        &self,
        user_id: Uuid,
        key: &PermissionKey,
    ) -> Option<(Decision, AccessReason)> {
        self.slots
            .read()
            .get(&user_id)
            .and_then(|slot| slot.decisions.get(key).copied())
    }

    /// Memoize a decision for a key.
    ///
    /// A no-op if the user's slot was invalidated in the meantime: a
    /// decision must never outlive the resolution it was computed from.
    pub fn memoize(
        &self,
        user_id: Uuid,
        key: PermissionKey,
        decision: Decision,
        reason: AccessReason,
    ) {
        if let Some(slot) = self.slots.write().get_mut(&user_id) {
            slot.decisions.insert(key, (decision, reason));
        }
    }

    /// Drop one user's slot. Returns whether anything was cached.
    pub fn invalidate(&self, user_id: Uuid) -> bool {
        self.slots.write().remove(&user_id).is_some()
    }

    /// Drop every slot.
    pub fn clear(&self) {
        self.slots.write().clear();
    }

    /// Number of users currently cached.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
