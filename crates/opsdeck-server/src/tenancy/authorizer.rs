//! Membership-based authorization predicates
//!
//! Two predicates over (user, resolved tenant). Both evaluate to `false`
//! when the tenant is unresolved or the user is anonymous; they never treat
//! absence as an error. Routes compose them by conjunction: mutating
//! endpoints require `is_member`, destructive tenant administration
//! additionally requires `is_owner_or_admin`.

use sqlx::PgPool;
use uuid::Uuid;

use super::models::Organization;
use super::RequestContext;
use crate::error::{AppError, AppResult};

/// True iff a membership row exists for (user, tenant), regardless of role
pub async fn is_member(
    pool: &PgPool,
    user_id: Option<Uuid>,
    organization: Option<&Organization>,
) -> AppResult<bool> {
    let (user_id, org) = match (user_id, organization) {
        (Some(user_id), Some(org)) => (user_id, org),
        _ => return Ok(false),
    };

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM memberships
            WHERE user_id = $1 AND organization_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(org.id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// True iff a membership row exists with role owner or admin
pub async fn is_owner_or_admin(
    pool: &PgPool,
    user_id: Option<Uuid>,
    organization: Option<&Organization>,
) -> AppResult<bool> {
    let (user_id, org) = match (user_id, organization) {
        (Some(user_id), Some(org)) => (user_id, org),
        _ => return Ok(false),
    };

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM memberships
            WHERE user_id = $1 AND organization_id = $2 AND role IN ('owner', 'admin')
        )
        "#,
    )
    .bind(user_id)
    .bind(org.id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Gate for member-only endpoints
///
/// Returns the acting user id and organization on success, so handlers do
/// not have to unwrap the context twice. Denial is `Forbidden`, never
/// `NotFound`.
pub async fn require_member<'a>(
    pool: &PgPool,
    ctx: &'a RequestContext,
) -> AppResult<(Uuid, &'a Organization)> {
    if !is_member(pool, ctx.user_id, ctx.organization_ref()).await? {
        return Err(AppError::Forbidden(
            "You are not a member of this organization".to_string(),
        ));
    }
    // is_member == true implies both are present
    match (ctx.user_id, ctx.organization_ref()) {
        (Some(user_id), Some(org)) => Ok((user_id, org)),
        _ => Err(AppError::Forbidden(
            "You are not a member of this organization".to_string(),
        )),
    }
}

/// Gate for owner/admin-only endpoints; composes with [`require_member`]
pub async fn require_owner_or_admin<'a>(
    pool: &PgPool,
    ctx: &'a RequestContext,
) -> AppResult<(Uuid, &'a Organization)> {
    let (user_id, org) = require_member(pool, ctx).await?;
    if !is_owner_or_admin(pool, ctx.user_id, ctx.organization_ref()).await? {
        return Err(AppError::Forbidden(
            "This action requires an owner or admin role".to_string(),
        ));
    }
    Ok((user_id, org))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn org_row(id: Uuid) -> Organization {
        Organization {
            id,
            slug: "acme".to_string(),
            name: "Acme Inc".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn seed_user(pool: &PgPool, username: &str) -> Uuid {
        sqlx::query_scalar("INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(format!("{username}@example.com"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed_org(pool: &PgPool, slug: &str) -> Uuid {
        sqlx::query_scalar("INSERT INTO organizations (slug, name) VALUES ($1, $2) RETURNING id")
            .bind(slug)
            .bind("Acme Inc")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed_membership(pool: &PgPool, user_id: Uuid, org_id: Uuid, role: &str) {
        sqlx::query("INSERT INTO memberships (user_id, organization_id, role) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(org_id)
            .bind(role)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_member_of_any_role_passes_is_member(pool: PgPool) -> AppResult<()> {
        let user_id = seed_user(&pool, "casey").await;
        let org_id = seed_org(&pool, "acme").await;
        seed_membership(&pool, user_id, org_id, "employee").await;
        let org = org_row(org_id);

        assert!(is_member(&pool, Some(user_id), Some(&org)).await?);
        assert!(!is_owner_or_admin(&pool, Some(user_id), Some(&org)).await?);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_admin_passes_both_predicates(pool: PgPool) -> AppResult<()> {
        let user_id = seed_user(&pool, "casey").await;
        let org_id = seed_org(&pool, "acme").await;
        seed_membership(&pool, user_id, org_id, "admin").await;
        let org = org_row(org_id);

        assert!(is_member(&pool, Some(user_id), Some(&org)).await?);
        assert!(is_owner_or_admin(&pool, Some(user_id), Some(&org)).await?);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_absent_tenant_or_user_is_false_not_error(pool: PgPool) -> AppResult<()> {
        let user_id = seed_user(&pool, "casey").await;
        let org_id = seed_org(&pool, "acme").await;
        let org = org_row(org_id);

        assert!(!is_member(&pool, Some(user_id), None).await?);
        assert!(!is_member(&pool, None, Some(&org)).await?);
        assert!(!is_owner_or_admin(&pool, None, None).await?);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_non_member_is_false(pool: PgPool) -> AppResult<()> {
        let user_id = seed_user(&pool, "outsider").await;
        let org_id = seed_org(&pool, "acme").await;
        let org = org_row(org_id);

        assert!(!is_member(&pool, Some(user_id), Some(&org)).await?);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_require_member_denies_with_forbidden(pool: PgPool) -> AppResult<()> {
        let ctx = RequestContext::default();
        let result = require_member(&pool, &ctx).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        Ok(())
    }
}
