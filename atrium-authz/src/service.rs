//! Authorization service
//!
//! The allow/deny decision point. One explicitly constructed
//! [`AuthzService`] instance owns the resolver, cache, and audit wiring;
//! its lifecycle is tied to application startup rather than module load,
//! and callers receive it by injection.
//!
//! Contract highlights:
//! - [`check`](AuthzService::check) always returns a decision, never an
//!   error: internal failures deny with reason `system_error`.
//! - Every full check records exactly one audit entry, with the decision
//!   that was returned, before returning.
//! - [`check_cached`](AuthzService::check_cached) is the synchronous
//!   variant for render paths: cache-only, no I/O, no audit, and `false`
//!   when nothing is cached yet.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_audit::{AccessReason, AuditEmitter, AuditEntry, Decision};
use atrium_rbac::{Action, PermissionKey, Resource};

use crate::context::PermissionContext;
use crate::error::AuthzResult;
use crate::resolver::PermissionResolver;

/// The result of an authorization check: the decision plus the reason
/// it was reached. The same pair goes into the audit entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Allow or deny.
    pub decision: Decision,
    /// Why.
    pub reason: AccessReason,
}

impl AccessOutcome {
    /// Check if access was granted.
    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }

    fn denied(reason: AccessReason) -> Self {
        Self {
            decision: Decision::Denied,
            reason,
        }
    }
}

/// The authorization decision engine.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use atrium_audit::{AuditEmitter, MemoryAuditSink};
/// use atrium_authz::{AuthzService, MemoryRoleStore, PermissionContext, PermissionResolver};
/// use atrium_rbac::{Action, PermissionCatalog, Resource};
///
/// # async fn example() {
/// let resolver = PermissionResolver::new(
///     Arc::new(MemoryRoleStore::builtin()),
///     Arc::new(PermissionCatalog::builtin()),
/// );
/// let emitter = Arc::new(AuditEmitter::new(Arc::new(MemoryAuditSink::new())));
/// let service = AuthzService::new(resolver, emitter);
///
/// let ctx = PermissionContext::new(Uuid::now_v7(), Resource::Employees, Action::Read);
/// let outcome = service.check(&ctx).await;
/// assert!(!outcome.is_allowed()); // no roles assigned
/// # }
/// ```
pub struct AuthzService {
    /// Resolution + cache.
    resolver: PermissionResolver,
    /// Audit pipeline.
    emitter: Arc<AuditEmitter>,
}

impl std::fmt::Debug for AuthzService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzService")
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl AuthzService {
    /// Create a service from its collaborators.
    pub fn new(resolver: PermissionResolver, emitter: Arc<AuditEmitter>) -> Self {
        Self { resolver, emitter }
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// The audit emitter this service records into.
    pub fn emitter(&self) -> &Arc<AuditEmitter> {
        &self.emitter
    }

    /// Full authorization check.
    ///
    /// Resolves (through the cache), matches exact then wildcard grants,
    /// records exactly one audit entry, and returns the decision. Never
    /// returns an error: any internal failure — role store down, cache
    /// trouble — is caught, logged, and denied with `system_error`.
    /// Audit-sink trouble is logged and does not change the decision.
    pub async fn check(&self, ctx: &PermissionContext) -> AccessOutcome {
        let key = ctx.key();

        let outcome = match self.decide(ctx.user_id, &key).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    user_id = %ctx.user_id,
                    permission = %key,
                    error = %e,
                    "authorization check failed internally, denying"
                );
                AccessOutcome::denied(AccessReason::SystemError)
            }
        };

        self.audit(ctx, &outcome).await;
        outcome
    }

    /// Synchronous cache-only check for render paths.
    ///
    /// Consults the per-user cache and nothing else: no role lookup, no
    /// catalog I/O, no audit entry, no blocking. Returns `false` when
    /// the user has no cached resolution yet — "not yet known" is
    /// indistinguishable from "denied" here by design of the fail-closed
    /// contract; the guard layer exposes a loading flag for callers that
    /// need to tell them apart.
    pub fn check_cached(&self, user_id: Uuid, resource: Resource, action: Action) -> bool {
        let key = PermissionKey::new(resource, action);
        let cache = self.resolver.cache();

        if let Some((decision, _)) = cache.cached_decision(user_id, &key) {
            return decision.is_allowed();
        }

        match cache.get(user_id) {
            Some(resolved) => {
                let (allowed, reason) = resolved.evaluate(&key);
                let decision = if allowed {
                    Decision::Allowed
                } else {
                    Decision::Denied
                };
                cache.memoize(user_id, key, decision, reason);
                allowed
            }
            None => false,
        }
    }

    /// Evaluate a batch of (resource, action) pairs for one user.
    ///
    /// N independent full checks — each one audited — keyed by the
    /// canonical `"resource.action"` string. The per-user cache makes
    /// the batch cost one role resolution, not N.
    pub async fn check_many(
        &self,
        user_id: Uuid,
        pairs: &[(Resource, Action)],
    ) -> HashMap<String, bool> {
        let mut results = HashMap::with_capacity(pairs.len());
        for &(resource, action) in pairs {
            let ctx = PermissionContext::new(user_id, resource, action);
            let outcome = self.check(&ctx).await;
            results.insert(ctx.key().to_string(), outcome.is_allowed());
        }
        results
    }

    /// Drop the cached resolution for one user.
    ///
    /// The external role-assignment-change signal and logout both land
    /// here; the next check re-resolves from the role store.
    pub fn invalidate_user(&self, user_id: Uuid) -> bool {
        self.resolver.invalidate(user_id)
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.resolver.clear_cache();
    }

    /// Decide without auditing. Errors bubble to `check`, which denies.
    async fn decide(&self, user_id: Uuid, key: &PermissionKey) -> AuthzResult<AccessOutcome> {
        let cache = self.resolver.cache();

        if let Some((decision, reason)) = cache.cached_decision(user_id, key) {
            return Ok(AccessOutcome { decision, reason });
        }

        let resolved = self.resolver.resolve(user_id).await?;
        let (allowed, reason) = resolved.evaluate(key);
        let decision = if allowed {
            Decision::Allowed
        } else {
            tracing::debug!(user_id = %user_id, permission = %key, reason = reason.as_str(), "access denied");
            Decision::Denied
        };
        cache.memoize(user_id, *key, decision, reason);

        Ok(AccessOutcome { decision, reason })
    }

    /// Record the audit entry for a finished check.
    async fn audit(&self, ctx: &PermissionContext, outcome: &AccessOutcome) {
        let mut entry = AuditEntry::new(ctx.user_id, ctx.resource, ctx.action, outcome.decision)
            .with_reason(outcome.reason);
        if let Some(org_id) = ctx.org_id {
            entry = entry.with_org(org_id);
        }
        if let Some(resource_id) = &ctx.resource_id {
            entry = entry.with_resource_id(resource_id.clone());
        }
        for (key, value) in &ctx.additional_context {
            entry = entry.with_context(key.clone(), value.clone());
        }
        // Sensitive permissions get stricter audit detail.
        if let Some(perm) = self.resolver.catalog().get(&ctx.key()) {
            if perm.is_sensitive {
                entry = entry.with_context("sensitive", serde_json::json!(true));
            }
        }

        self.emitter.record(entry);
        if let Err(e) = self.emitter.flush_if_full().await {
            // The decision already stands; delivery will be retried on a
            // later flush.
            tracing::warn!(error = %e, "audit flush failed, entries retained");
        }
    }
}
