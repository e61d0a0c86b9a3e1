//! Add member command
//!
//! Grants a user a role in the current organization. Restricted to
//! owners/admins by the route layer.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::MembershipRole;

use crate::error::AppError;
use crate::tenancy::Membership;

/// Command to add a member to an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberCommand {
    pub user_id: Uuid,
    /// One of: owner, admin, manager, employee
    pub role: String,
}

/// Errors that can occur when adding a member
#[derive(Debug, thiserror::Error)]
pub enum AddMemberError {
    #[error("'{0}' is not a valid membership role")]
    InvalidRole(String),

    #[error("User is already a member of this organization")]
    AlreadyMember,

    #[error("User '{0}' does not exist")]
    UnknownUser(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AddMemberError> for AppError {
    fn from(err: AddMemberError) -> Self {
        match err {
            AddMemberError::InvalidRole(_) => AppError::Validation(err.to_string()),
            AddMemberError::AlreadyMember => AppError::Conflict(err.to_string()),
            AddMemberError::UnknownUser(_) => AppError::NotFound(err.to_string()),
            AddMemberError::Database(e) => AppError::Database(e),
        }
    }
}

impl AddMemberCommand {
    /// Validates the command, returning the parsed role
    pub fn validate(&self) -> Result<MembershipRole, AddMemberError> {
        self.role
            .parse()
            .map_err(|_| AddMemberError::InvalidRole(self.role.clone()))
    }
}

/// Handler function for adding members
#[tracing::instrument(skip(pool, command), fields(user_id = %command.user_id, role = %command.role))]
pub async fn handle(
    pool: PgPool,
    organization_id: Uuid,
    command: AddMemberCommand,
) -> Result<Membership, AddMemberError> {
    let role = command.validate()?;

    let membership = sqlx::query_as::<_, Membership>(
        r#"
        INSERT INTO memberships (user_id, organization_id, role)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, organization_id, role, created_at, updated_at
        "#,
    )
    .bind(command.user_id)
    .bind(organization_id)
    .bind(role.as_str())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return AddMemberError::AlreadyMember;
            }
            if db_err.is_foreign_key_violation() {
                return AddMemberError::UnknownUser(command.user_id);
            }
        }
        AddMemberError::Database(e)
    })?;

    tracing::info!(
        membership_id = %membership.id,
        org_id = %organization_id,
        "Member added"
    );

    Ok(membership)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_parses_known_roles() {
        for role in ["owner", "admin", "manager", "employee"] {
            let cmd = AddMemberCommand {
                user_id: Uuid::new_v4(),
                role: role.to_string(),
            };
            assert!(cmd.validate().is_ok());
        }
    }

    #[test]
    fn test_validation_rejects_unknown_role() {
        let cmd = AddMemberCommand {
            user_id: Uuid::new_v4(),
            role: "superuser".to_string(),
        };
        assert!(matches!(cmd.validate(), Err(AddMemberError::InvalidRole(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_adds_member_and_rejects_duplicates(pool: PgPool) -> sqlx::Result<()> {
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

        let cmd = AddMemberCommand {
            user_id,
            role: "manager".to_string(),
        };
        let membership = handle(pool.clone(), org_id, cmd.clone()).await.unwrap();
        assert_eq!(membership.role, "manager");

        let result = handle(pool.clone(), org_id, cmd).await;
        assert!(matches!(result, Err(AddMemberError::AlreadyMember)));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_unknown_user_rejected(pool: PgPool) -> sqlx::Result<()> {
        let org_id: Uuid = sqlx::query_scalar(
            "INSERT INTO organizations (slug, name) VALUES ('acme', 'Acme') RETURNING id",
        )
        .fetch_one(&pool)
        .await?;

        let result = handle(
            pool.clone(),
            org_id,
            AddMemberCommand {
                user_id: Uuid::new_v4(),
                role: "employee".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(AddMemberError::UnknownUser(_))));
        Ok(())
    }
}
