//! List members query
//!
//! Returns the membership roster of the current organization. Restricted to
//! owners/admins by the route layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// One roster entry, joined with the user's display fields
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Handler function listing an organization's members
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, organization_id: Uuid) -> AppResult<Vec<MemberListItem>> {
    let members = sqlx::query_as::<_, MemberListItem>(
        r#"
        SELECT m.id, m.user_id, u.username, m.role, m.created_at
        FROM memberships m
        JOIN users u ON u.id = m.user_id
        WHERE m.organization_id = $1
        ORDER BY m.created_at
        "#,
    )
    .bind(organization_id)
    .fetch_all(&pool)
    .await?;

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_lists_roster_in_join_order(pool: PgPool) -> AppResult<()> {
        let org_id: Uuid = sqlx::query_scalar(
            "INSERT INTO organizations (slug, name) VALUES ('acme', 'Acme') RETURNING id",
        )
        .fetch_one(&pool)
        .await?;
        for (username, role) in [("casey", "owner"), ("dana", "employee")] {
            let user_id: Uuid = sqlx::query_scalar(
                "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id",
            )
            .bind(username)
            .bind(format!("{username}@example.com"))
            .fetch_one(&pool)
            .await?;
            sqlx::query(
                "INSERT INTO memberships (user_id, organization_id, role) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(org_id)
            .bind(role)
            .execute(&pool)
            .await?;
        }

        let members = handle(pool.clone(), org_id).await?;
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "casey");
        assert_eq!(members[0].role, "owner");
        Ok(())
    }
}
