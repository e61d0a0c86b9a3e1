//! Mutation interception
//!
//! Explicit decoration around persistence calls: each wrapper takes the
//! actual write as a lazy future and performs the snapshot/record sequence
//! around it, composed at command call sites. Futures do not run until
//! polled, so the wrapper fully controls when the mutation executes.
//!
//! Ordering is strict and never reordered within a request:
//! before-snapshot -> mutate -> after-snapshot -> record.
//!
//! Failure semantics are deliberately asymmetric:
//! - if the persistence step fails, no audit entry is written;
//! - if the audit write (or the snapshot it depends on) fails after a
//!   successful persistence call, the business mutation stands and the
//!   failure is logged. Audit is a secondary concern and must never roll
//!   back or block the primary operation.
//!
//! Each invocation appends exactly one entry; this is an append-only log,
//! not a dedup cache.

use sqlx::PgPool;
use std::future::Future;
use tracing::error;

use super::introspect::{resolve_tenant, snapshot, Auditable, SnapshotError};
use super::models::{AuditAction, NewAuditEntry};
use super::queries::record_entry;
use crate::tenancy::RequestContext;

/// Wrap an entity creation
///
/// Runs the persistence step, then records a create entry whose `after`
/// snapshot is taken from the resulting row. `before` is always null.
pub async fn audited_create<E, Fut>(
    pool: &PgPool,
    ctx: &RequestContext,
    persist: Fut,
) -> Result<E, sqlx::Error>
where
    E: Auditable,
    Fut: Future<Output = Result<E, sqlx::Error>>,
{
    let entity = persist.await?;

    match snapshot(&entity) {
        Ok(after) => {
            write_entry(pool, ctx, AuditAction::Create, &entity, None, Some(after)).await;
        },
        Err(error) => log_snapshot_failure::<E>(AuditAction::Create, &error),
    }

    Ok(entity)
}

/// Wrap an entity update
///
/// The `before` snapshot is captured from the supplied pre-image strictly
/// prior to executing the persistence step; the `after` snapshot comes from
/// the row the step returns.
pub async fn audited_update<E, Fut>(
    pool: &PgPool,
    ctx: &RequestContext,
    before: &E,
    persist: Fut,
) -> Result<E, sqlx::Error>
where
    E: Auditable,
    Fut: Future<Output = Result<E, sqlx::Error>>,
{
    // Must be taken before the mutation executes, or the trail is
    // meaningless.
    let before_snapshot = snapshot(before);

    let entity = persist.await?;

    match (before_snapshot, snapshot(&entity)) {
        (Ok(before), Ok(after)) => {
            write_entry(
                pool,
                ctx,
                AuditAction::Update,
                &entity,
                Some(before),
                Some(after),
            )
            .await;
        },
        (Err(error), _) | (_, Err(error)) => {
            log_snapshot_failure::<E>(AuditAction::Update, &error)
        },
    }

    Ok(entity)
}

/// Wrap an entity deletion
///
/// The snapshot is captured before the delete executes - the row no longer
/// exists afterwards. `after` is always null.
pub async fn audited_delete<E, Fut>(
    pool: &PgPool,
    ctx: &RequestContext,
    entity: &E,
    persist: Fut,
) -> Result<(), sqlx::Error>
where
    E: Auditable,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let before_snapshot = snapshot(entity);

    persist.await?;

    match before_snapshot {
        Ok(before) => {
            write_entry(pool, ctx, AuditAction::Delete, entity, Some(before), None).await;
        },
        Err(error) => log_snapshot_failure::<E>(AuditAction::Delete, &error),
    }

    Ok(())
}

/// Best-effort audit write; failures are reported, never propagated
async fn write_entry<E: Auditable>(
    pool: &PgPool,
    ctx: &RequestContext,
    action: AuditAction,
    subject: &E,
    before: Option<serde_json::Value>,
    after: Option<serde_json::Value>,
) {
    let entry = NewAuditEntry {
        user_id: ctx.user_id,
        organization_id: resolve_tenant(subject, ctx),
        action,
        entity_type: E::descriptor().entity_type.to_string(),
        entity_id: subject.entity_id(),
        before,
        after,
    };

    if let Err(error) = record_entry(pool, entry).await {
        error!(
            %error,
            entity_type = E::descriptor().entity_type,
            action = %action,
            "Audit write failed; business mutation is preserved"
        );
    }
}

fn log_snapshot_failure<E: Auditable>(action: AuditAction, error: &SnapshotError) {
    error!(
        %error,
        entity_type = E::descriptor().entity_type,
        action = %action,
        "Snapshot introspection failed; skipping audit entry for this mutation"
    );
}
