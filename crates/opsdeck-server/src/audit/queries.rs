//! Database queries for the audit log

use sqlx::PgPool;
use tracing::debug;

use super::models::{
    AuditEntry, AuditQuery, NewAuditEntry, DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT,
};
use crate::error::AppResult;

/// Append one immutable audit entry
///
/// A single durable write with no retries; the caller's failure model
/// governs. Null user and organization references are legitimate and stored
/// as such.
pub async fn record_entry(pool: &PgPool, entry: NewAuditEntry) -> AppResult<AuditEntry> {
    let record = sqlx::query_as::<_, AuditEntry>(
        r#"
        INSERT INTO audit_log (
            user_id, organization_id, action, entity_type, entity_id, before, after
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, organization_id, action, entity_type, entity_id,
                  before, after, created_at
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.organization_id)
    .bind(entry.action.as_str())
    .bind(&entry.entity_type)
    .bind(&entry.entity_id)
    .bind(&entry.before)
    .bind(&entry.after)
    .fetch_one(pool)
    .await?;

    debug!(
        audit_id = %record.id,
        action = %entry.action,
        entity_type = %entry.entity_type,
        entity_id = %entry.entity_id,
        "Recorded audit entry"
    );

    Ok(record)
}

/// List audit entries for one organization, newest first
pub async fn list_organization_entries(
    pool: &PgPool,
    organization_id: uuid::Uuid,
    query: &AuditQuery,
) -> AppResult<Vec<AuditEntry>> {
    let limit = query.limit.clamp(1, MAX_AUDIT_QUERY_LIMIT);

    let records = sqlx::query_as::<_, AuditEntry>(
        r#"
        SELECT id, user_id, organization_id, action, entity_type, entity_id,
               before, after, created_at
        FROM audit_log
        WHERE organization_id = $1
          AND ($2::TEXT IS NULL OR action = $2)
          AND ($3::TEXT IS NULL OR entity_type = $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(organization_id)
    .bind(query.action.map(|a| a.as_str()))
    .bind(query.entity_type.as_deref())
    .bind(limit)
    .bind(query.offset.max(0))
    .fetch_all(pool)
    .await?;

    debug!(
        organization_id = %organization_id,
        count = records.len(),
        "Listed organization audit entries"
    );

    Ok(records)
}

/// Get the audit trail for a specific entity, newest first
pub async fn entity_trail(
    pool: &PgPool,
    entity_type: &str,
    entity_id: &str,
    limit: Option<i64>,
) -> AppResult<Vec<AuditEntry>> {
    let limit = limit
        .unwrap_or(DEFAULT_AUDIT_QUERY_LIMIT)
        .clamp(1, MAX_AUDIT_QUERY_LIMIT);

    let records = sqlx::query_as::<_, AuditEntry>(
        r#"
        SELECT id, user_id, organization_id, action, entity_type, entity_id,
               before, after, created_at
        FROM audit_log
        WHERE entity_type = $1 AND entity_id = $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(entity_type)
    .bind(entity_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::models::AuditAction;
    use serde_json::json;
    use uuid::Uuid;

    fn entry(action: AuditAction, organization_id: Option<Uuid>) -> NewAuditEntry {
        NewAuditEntry {
            user_id: Some(Uuid::new_v4()),
            organization_id,
            action,
            entity_type: "project".to_string(),
            entity_id: Uuid::new_v4().to_string(),
            before: None,
            after: Some(json!({"name": "Website relaunch"})),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_record_entry_without_user_or_tenant(pool: PgPool) -> AppResult<()> {
        let record = record_entry(
            &pool,
            NewAuditEntry {
                user_id: None,
                organization_id: None,
                action: AuditAction::Create,
                entity_type: "project".to_string(),
                entity_id: Uuid::new_v4().to_string(),
                before: None,
                after: Some(json!({"name": "Orphaned"})),
            },
        )
        .await?;

        assert_eq!(record.action, "create");
        assert!(record.user_id.is_none());
        assert!(record.organization_id.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_listing_is_tenant_scoped_and_newest_first(pool: PgPool) -> AppResult<()> {
        let org_id: Uuid =
            sqlx::query_scalar("INSERT INTO organizations (slug, name) VALUES ('acme', 'Acme') RETURNING id")
                .fetch_one(&pool)
                .await?;
        let other_org: Uuid =
            sqlx::query_scalar("INSERT INTO organizations (slug, name) VALUES ('umbrella', 'Umbrella') RETURNING id")
                .fetch_one(&pool)
                .await?;

        // user_id references must exist or be null; use null actors here
        for action in [AuditAction::Create, AuditAction::Update, AuditAction::Delete] {
            let mut e = entry(action, Some(org_id));
            e.user_id = None;
            record_entry(&pool, e).await?;
        }
        let mut foreign = entry(AuditAction::Create, Some(other_org));
        foreign.user_id = None;
        record_entry(&pool, foreign).await?;

        let records =
            list_organization_entries(&pool, org_id, &AuditQuery::default()).await?;

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.organization_id == Some(org_id)));
        assert!(records.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_action_filter(pool: PgPool) -> AppResult<()> {
        let org_id: Uuid =
            sqlx::query_scalar("INSERT INTO organizations (slug, name) VALUES ('acme', 'Acme') RETURNING id")
                .fetch_one(&pool)
                .await?;

        for action in [AuditAction::Create, AuditAction::Delete] {
            let mut e = entry(action, Some(org_id));
            e.user_id = None;
            record_entry(&pool, e).await?;
        }

        let query = AuditQuery {
            action: Some(AuditAction::Delete),
            ..Default::default()
        };
        let records = list_organization_entries(&pool, org_id, &query).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, "delete");
        Ok(())
    }
}
