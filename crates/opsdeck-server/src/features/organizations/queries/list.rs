//! List organizations query
//!
//! Returns the organizations the acting user belongs to. Not tenant-gated:
//! this is how a client discovers its tenants in the first place.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::tenancy::Organization;

/// Handler function listing the acting user's organizations
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, user_id: Option<Uuid>) -> AppResult<Vec<Organization>> {
    let user_id = user_id
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let organizations = sqlx::query_as::<_, Organization>(
        r#"
        SELECT o.id, o.slug, o.name, o.created_at, o.updated_at
        FROM organizations o
        JOIN memberships m ON m.organization_id = o.id
        WHERE m.user_id = $1
        ORDER BY o.name
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(organizations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_lists_only_memberships(pool: PgPool) -> AppResult<()> {
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email) VALUES ('casey', 'casey@example.com') RETURNING id",
        )
        .fetch_one(&pool)
        .await?;
        let mine: Uuid = sqlx::query_scalar(
            "INSERT INTO organizations (slug, name) VALUES ('acme', 'Acme') RETURNING id",
        )
        .fetch_one(&pool)
        .await?;
        sqlx::query(
            "INSERT INTO organizations (slug, name) VALUES ('umbrella', 'Umbrella')",
        )
        .execute(&pool)
        .await?;
        sqlx::query("INSERT INTO memberships (user_id, organization_id, role) VALUES ($1, $2, 'owner')")
            .bind(user_id)
            .bind(mine)
            .execute(&pool)
            .await?;

        let organizations = handle(pool.clone(), Some(user_id)).await?;
        assert_eq!(organizations.len(), 1);
        assert_eq!(organizations[0].slug, "acme");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_anonymous_is_unauthorized(pool: PgPool) -> AppResult<()> {
        let result = handle(pool.clone(), None).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        Ok(())
    }
}
