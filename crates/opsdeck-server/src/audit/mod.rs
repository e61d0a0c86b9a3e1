//! Change auditing module
//!
//! Captures an immutable before/after record for every mutating operation
//! across heterogeneous entity types.
//!
//! # Architecture
//!
//! - [`introspect`] - per-entity-type descriptors, field snapshots, and
//!   ordered tenant resolution
//! - [`interceptor`] - `audited_create` / `audited_update` /
//!   `audited_delete` wrappers composed around persistence calls
//! - [`queries`] - the append-only `audit_log` write and the tenant-scoped
//!   listings
//! - [`routes`] - the read-only retrieval endpoint for owners/admins
//!
//! Snapshot nullability encodes the action kind: create has `before = null`,
//! delete has `after = null`, update carries both. Audit writes are
//! best-effort by design - a failed audit write is logged and never rolls
//! back the business mutation it was attached to, while a failed business
//! mutation never produces an entry.
//!
//! # Example
//!
//! ```rust,ignore
//! use opsdeck_server::audit::interceptor::audited_create;
//!
//! let project = audited_create(&pool, &ctx, async {
//!     sqlx::query_as::<_, Project>("INSERT INTO projects ... RETURNING *")
//!         .fetch_one(&pool)
//!         .await
//! })
//! .await?;
//! ```

pub mod interceptor;
pub mod introspect;
pub mod models;
pub mod queries;
pub mod routes;

pub use interceptor::{audited_create, audited_delete, audited_update};
pub use introspect::{
    resolve_tenant, snapshot, Auditable, EntityDescriptor, FieldDescriptor, FieldKind,
    SnapshotError, TenantRef,
};
pub use models::{
    AuditAction, AuditEntry, AuditQuery, NewAuditEntry, DEFAULT_AUDIT_QUERY_LIMIT,
    MAX_AUDIT_QUERY_LIMIT,
};
pub use queries::{entity_trail, list_organization_entries, record_entry};
pub use routes::audit_routes;
