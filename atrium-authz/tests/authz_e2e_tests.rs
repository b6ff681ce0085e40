//! End-to-end tests for the authorization engine.
//!
//! These tests wire the full stack — role store → resolver → cache →
//! check → audit emitter → sink — using the in-crate memory
//! implementations, and verify the externally observable contract:
//! decisions, reasons, audit completeness, cache invalidation, and
//! flush batching.

use std::sync::Arc;

use uuid::Uuid;

use atrium_audit::{AccessReason, AuditConfig, AuditEmitter, Decision, MemoryAuditSink, RetryPolicy};
use atrium_authz::{AuthzService, MemoryRoleStore, PermissionContext, PermissionResolver};
use atrium_rbac::{Action, PermissionCatalog, Resource, Role, RoleCatalog};

/// Test fixture wiring a service over purpose-built roles.
struct TestFixture {
    /// The engine under test.
    service: AuthzService,
    /// Role store, for assignments and lookup counting.
    store: Arc<MemoryRoleStore>,
    /// Audit sink, for inspecting the trail.
    sink: Arc<MemoryAuditSink>,
}

impl TestFixture {
    /// Build a fixture with the given audit flush threshold.
    fn with_flush_threshold(threshold: usize) -> Self {
        let roles = RoleCatalog::new(vec![
            Role::new("viewer", "Viewer")
                .with_permissions(&["employees.read"])
                .unwrap(),
            Role::new("employees_admin", "Employees Admin")
                .with_permissions(&["employees.*"])
                .unwrap(),
            Role::new("reader_all", "Reader")
                .with_permissions(&["*.read"])
                .unwrap(),
            Role::new("root", "Root").with_permissions(&["*.*"]).unwrap(),
            Role::new("creator", "Creator")
                .with_permissions(&["employees.create"])
                .unwrap(),
        ])
        .unwrap();

        let store = Arc::new(MemoryRoleStore::new(roles));
        let sink = Arc::new(MemoryAuditSink::new());
        let resolver = PermissionResolver::new(
            store.clone(),
            Arc::new(PermissionCatalog::builtin()),
        );
        let emitter = Arc::new(AuditEmitter::with_config(
            sink.clone(),
            AuditConfig {
                flush_threshold: threshold,
                retry: RetryPolicy::none(),
            },
        ));

        Self {
            service: AuthzService::new(resolver, emitter),
            store,
            sink,
        }
    }

    fn new() -> Self {
        Self::with_flush_threshold(100)
    }

    /// A fresh user holding the given roles.
    fn user_with(&self, roles: &[&str]) -> Uuid {
        let user = Uuid::now_v7();
        for role in roles {
            self.store.assign(user, role).unwrap();
        }
        user
    }

    /// Drain the audit queue and return the full trail.
    async fn audit_trail(&self) -> Vec<atrium_audit::AuditEntry> {
        self.service.emitter().flush().await.unwrap();
        self.sink.entries()
    }
}

// =============================================================================
// Decisions and reasons
// =============================================================================

#[tokio::test]
async fn test_exact_grant_allows_with_direct_reason() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["viewer"]);

    let ctx = PermissionContext::new(user, Resource::Employees, Action::Read);
    let outcome = fixture.service.check(&ctx).await;

    assert!(outcome.is_allowed());
    assert_eq!(outcome.reason, AccessReason::DirectPermission);
}

#[tokio::test]
async fn test_action_wildcard_allows_with_wildcard_reason() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["employees_admin"]);

    let ctx = PermissionContext::new(user, Resource::Employees, Action::Delete);
    let outcome = fixture.service.check(&ctx).await;

    assert!(outcome.is_allowed());
    assert_eq!(outcome.reason, AccessReason::WildcardPermission);
}

#[tokio::test]
async fn test_ungranted_resource_denies() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["viewer"]);

    let ctx = PermissionContext::new(user, Resource::Payroll, Action::Read);
    let outcome = fixture.service.check(&ctx).await;

    assert!(!outcome.is_allowed());
    assert_eq!(outcome.reason, AccessReason::PermissionNotFound);
}

#[tokio::test]
async fn test_user_with_no_roles_is_denied_everything() {
    let fixture = TestFixture::new();
    let user = Uuid::now_v7();

    for (resource, action) in [
        (Resource::Dashboard, Action::Read),
        (Resource::Employees, Action::Read),
        (Resource::Payroll, Action::Approve),
    ] {
        let ctx = PermissionContext::new(user, resource, action);
        assert!(!fixture.service.check(&ctx).await.is_allowed());
    }
}

// =============================================================================
// Wildcard containment
// =============================================================================

#[tokio::test]
async fn test_wildcard_grants_stay_in_their_lane() {
    let fixture = TestFixture::new();

    // employees.* allows any employees action, nothing on payroll.
    let admin = fixture.user_with(&["employees_admin"]);
    let allowed = PermissionContext::new(admin, Resource::Employees, Action::Create);
    let denied = PermissionContext::new(admin, Resource::Payroll, Action::Read);
    assert!(fixture.service.check(&allowed).await.is_allowed());
    assert!(!fixture.service.check(&denied).await.is_allowed());

    // *.read allows reading everything, never writing.
    let reader = fixture.user_with(&["reader_all"]);
    let read_payroll = PermissionContext::new(reader, Resource::Payroll, Action::Read);
    let update_employees = PermissionContext::new(reader, Resource::Employees, Action::Update);
    assert!(fixture.service.check(&read_payroll).await.is_allowed());
    assert!(!fixture.service.check(&update_employees).await.is_allowed());
}

#[tokio::test]
async fn test_full_wildcard_allows_everything() {
    let fixture = TestFixture::new();
    let root = fixture.user_with(&["root"]);

    for resource in Resource::all() {
        for action in Action::all() {
            let ctx = PermissionContext::new(root, resource, action);
            let outcome = fixture.service.check(&ctx).await;
            assert!(outcome.is_allowed(), "{}.{} denied", resource.as_str(), action.as_str());
        }
    }
}

// =============================================================================
// Batch checks
// =============================================================================

#[tokio::test]
async fn test_batch_check_maps_keys_to_decisions() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["creator"]);

    let results = fixture
        .service
        .check_many(
            user,
            &[
                (Resource::Employees, Action::Create),
                (Resource::Employees, Action::Delete),
            ],
        )
        .await;

    assert_eq!(results.len(), 2);
    assert!(results["employees.create"]);
    assert!(!results["employees.delete"]);

    // The whole batch cost a single role-store lookup.
    assert_eq!(fixture.store.lookups(), 1);
}

// =============================================================================
// Audit trail
// =============================================================================

#[tokio::test]
async fn test_every_check_lands_in_the_audit_trail() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["viewer"]);

    let allowed = PermissionContext::new(user, Resource::Employees, Action::Read);
    let denied = PermissionContext::new(user, Resource::Payroll, Action::Read);
    fixture.service.check(&allowed).await;
    fixture.service.check(&denied).await;

    let trail = fixture.audit_trail().await;
    assert_eq!(trail.len(), 2);

    assert_eq!(trail[0].user_id, user);
    assert_eq!(trail[0].decision, Decision::Allowed);
    assert_eq!(trail[0].reason, Some(AccessReason::DirectPermission));

    assert_eq!(trail[1].decision, Decision::Denied);
    assert_eq!(trail[1].reason, Some(AccessReason::PermissionNotFound));
}

#[tokio::test]
async fn test_flush_threshold_batches_first_hundred() {
    let fixture = TestFixture::with_flush_threshold(100);
    let user = fixture.user_with(&["root"]);

    for _ in 0..101 {
        let ctx = PermissionContext::new(user, Resource::Dashboard, Action::Read);
        fixture.service.check(&ctx).await;
    }

    // Exactly one flush happened, carrying the first 100 entries; the
    // 101st is still queued.
    assert_eq!(fixture.sink.write_count(), 1);
    assert_eq!(fixture.sink.batches()[0].len(), 100);
    assert_eq!(fixture.service.emitter().stats().queued, 1);
}

// =============================================================================
// Cache lifecycle
// =============================================================================

#[tokio::test]
async fn test_cache_clear_forces_reresolution() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["viewer"]);

    let ctx = PermissionContext::new(user, Resource::Employees, Action::Read);
    fixture.service.check(&ctx).await;
    fixture.service.check(&ctx).await;
    assert_eq!(fixture.store.lookups(), 1);

    fixture.service.invalidate_user(user);
    fixture.service.check(&ctx).await;
    assert_eq!(fixture.store.lookups(), 2);
}

#[tokio::test]
async fn test_role_change_takes_effect_after_invalidation() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["viewer"]);

    let ctx = PermissionContext::new(user, Resource::Employees, Action::Delete);
    assert!(!fixture.service.check(&ctx).await.is_allowed());

    fixture.store.assign(user, "employees_admin").unwrap();
    fixture.service.invalidate_user(user);

    let outcome = fixture.service.check(&ctx).await;
    assert!(outcome.is_allowed());
    assert_eq!(outcome.reason, AccessReason::WildcardPermission);
}

#[tokio::test]
async fn test_checks_for_different_users_do_not_interact() {
    let fixture = TestFixture::new();
    let viewer = fixture.user_with(&["viewer"]);
    let root = fixture.user_with(&["root"]);

    let viewer_ctx = PermissionContext::new(viewer, Resource::Payroll, Action::Read);
    let root_ctx = PermissionContext::new(root, Resource::Payroll, Action::Read);

    assert!(!fixture.service.check(&viewer_ctx).await.is_allowed());
    assert!(fixture.service.check(&root_ctx).await.is_allowed());

    // Invalidating one user leaves the other's cache untouched.
    fixture.service.invalidate_user(root);
    assert!(!fixture.service.check(&viewer_ctx).await.is_allowed());
}

// =============================================================================
// Failure semantics
// =============================================================================

#[tokio::test]
async fn test_store_outage_denies_and_audits_system_error() {
    let fixture = TestFixture::new();
    let user = fixture.user_with(&["root"]);
    fixture.store.set_failing(true);

    let ctx = PermissionContext::new(user, Resource::Employees, Action::Read);
    let outcome = fixture.service.check(&ctx).await;
    assert!(!outcome.is_allowed());
    assert_eq!(outcome.reason, AccessReason::SystemError);

    let trail = fixture.audit_trail().await;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].decision, Decision::Denied);
    assert_eq!(trail[0].reason, Some(AccessReason::SystemError));
}

#[tokio::test]
async fn test_sink_outage_retains_entries_and_decision() {
    let fixture = TestFixture::with_flush_threshold(1);
    let user = fixture.user_with(&["viewer"]);
    fixture.sink.set_failing(true);

    let ctx = PermissionContext::new(user, Resource::Employees, Action::Read);
    assert!(fixture.service.check(&ctx).await.is_allowed());
    assert_eq!(fixture.service.emitter().stats().queued, 1);

    fixture.sink.set_failing(false);
    let trail = fixture.audit_trail().await;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].decision, Decision::Allowed);
}
