//! Remove member command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Command to remove a member from an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMemberCommand {
    pub user_id: Uuid,
}

/// Response from removing a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMemberResponse {
    pub user_id: Uuid,
    pub removed: bool,
}

/// Errors that can occur when removing a member
#[derive(Debug, thiserror::Error)]
pub enum RemoveMemberError {
    #[error("User '{0}' is not a member of this organization")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RemoveMemberError> for AppError {
    fn from(err: RemoveMemberError) -> Self {
        match err {
            RemoveMemberError::NotFound(_) => AppError::NotFound(err.to_string()),
            RemoveMemberError::Database(e) => AppError::Database(e),
        }
    }
}

/// Handler function for removing members
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    organization_id: Uuid,
    command: RemoveMemberCommand,
) -> Result<RemoveMemberResponse, RemoveMemberError> {
    let result = sqlx::query(
        r#"
        DELETE FROM memberships
        WHERE user_id = $1 AND organization_id = $2
        "#,
    )
    .bind(command.user_id)
    .bind(organization_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RemoveMemberError::NotFound(command.user_id));
    }

    tracing::info!(
        user_id = %command.user_id,
        org_id = %organization_id,
        "Member removed"
    );

    Ok(RemoveMemberResponse {
        user_id: command.user_id,
        removed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_removes_member(pool: PgPool) -> sqlx::Result<()> {
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email) VALUES ('casey', 'casey@example.com') RETURNING id",
        )
        .fetch_one(&pool)
        .await?;
        let org_id: Uuid = sqlx::query_scalar(
            "INSERT INTO organizations (slug, name) VALUES ('acme', 'Acme') RETURNING id",
        )
        .fetch_one(&pool)
        .await?;
        sqlx::query("INSERT INTO memberships (user_id, organization_id, role) VALUES ($1, $2, 'employee')")
            .bind(user_id)
            .bind(org_id)
            .execute(&pool)
            .await?;

        let response = handle(pool.clone(), org_id, RemoveMemberCommand { user_id })
            .await
            .unwrap();
        assert!(response.removed);

        let result = handle(pool.clone(), org_id, RemoveMemberCommand { user_id }).await;
        assert!(matches!(result, Err(RemoveMemberError::NotFound(_))));
        Ok(())
    }
}
