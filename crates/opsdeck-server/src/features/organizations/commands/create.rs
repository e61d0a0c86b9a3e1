//! Create organization command
//!
//! Signup-style operation: creates the organization and, in the same
//! transaction, an owner membership for the acting user. Not tenant-gated -
//! any authenticated user may create an organization - and not audited,
//! since the organization is the audit scope itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::MembershipRole;

use crate::error::AppError;
use crate::features::shared::validation::{
    validate_name, validate_slug, NameValidationError, SlugValidationError,
};
use crate::tenancy::Organization;

/// Command to create a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationCommand {
    /// URL-safe slug (must be unique)
    pub slug: String,

    /// Display name of the organization
    pub name: String,
}

/// Response from creating an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    /// Role granted to the creator
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating an organization
#[derive(Debug, thiserror::Error)]
pub enum CreateOrganizationError {
    #[error("Slug validation failed: {0}")]
    SlugValidation(#[from] SlugValidationError),

    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Organization with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("An authenticated user is required to create an organization")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateOrganizationError> for AppError {
    fn from(err: CreateOrganizationError) -> Self {
        match err {
            CreateOrganizationError::SlugValidation(_)
            | CreateOrganizationError::NameValidation(_) => AppError::Validation(err.to_string()),
            CreateOrganizationError::DuplicateSlug(_) => AppError::Conflict(err.to_string()),
            CreateOrganizationError::Unauthenticated => AppError::Unauthorized(err.to_string()),
            CreateOrganizationError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateOrganizationCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), CreateOrganizationError> {
        validate_slug(&self.slug, 100)?;
        validate_name(&self.name, "name", 255)?;
        Ok(())
    }
}

/// Handler function for creating organizations
///
/// The organization insert and the creator's owner membership commit
/// together or not at all.
#[tracing::instrument(skip(pool, command), fields(slug = %command.slug))]
pub async fn handle(
    pool: PgPool,
    user_id: Option<Uuid>,
    command: CreateOrganizationCommand,
) -> Result<CreateOrganizationResponse, CreateOrganizationError> {
    command.validate()?;

    let user_id = user_id.ok_or(CreateOrganizationError::Unauthenticated)?;

    let mut tx = pool.begin().await?;

    let organization = sqlx::query_as::<_, Organization>(
        r#"
        INSERT INTO organizations (slug, name)
        VALUES ($1, $2)
        RETURNING id, slug, name, created_at, updated_at
        "#,
    )
    .bind(&command.slug)
    .bind(&command.name)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreateOrganizationError::DuplicateSlug(command.slug.clone());
            }
        }
        CreateOrganizationError::Database(e)
    })?;

    sqlx::query(
        r#"
        INSERT INTO memberships (user_id, organization_id, role)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(organization.id)
    .bind(MembershipRole::Owner.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        org_id = %organization.id,
        org_slug = %organization.slug,
        owner = %user_id,
        "Organization created with owner membership"
    );

    Ok(CreateOrganizationResponse {
        id: organization.id,
        slug: organization.slug,
        name: organization.name,
        role: MembershipRole::Owner.as_str().to_string(),
        created_at: organization.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(slug: &str, name: &str) -> CreateOrganizationCommand {
        CreateOrganizationCommand {
            slug: slug.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("acme", "Acme Inc").validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_slug() {
        assert!(matches!(
            command("Not A Slug", "Acme").validate(),
            Err(CreateOrganizationError::SlugValidation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        assert!(matches!(
            command("acme", "  ").validate(),
            Err(CreateOrganizationError::NameValidation(_))
        ));
    }

    async fn seed_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar("INSERT INTO users (username, email) VALUES ('casey', 'casey@example.com') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_creates_organization_with_owner_membership(pool: PgPool) -> sqlx::Result<()> {
        let user_id = seed_user(&pool).await;

        let response = handle(pool.clone(), Some(user_id), command("acme", "Acme Inc"))
            .await
            .unwrap();
        assert_eq!(response.slug, "acme");
        assert_eq!(response.role, "owner");

        let role: String = sqlx::query_scalar(
            "SELECT role FROM memberships WHERE user_id = $1 AND organization_id = $2",
        )
        .bind(user_id)
        .bind(response.id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(role, "owner");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_duplicate_slug_conflicts(pool: PgPool) -> sqlx::Result<()> {
        let user_id = seed_user(&pool).await;

        handle(pool.clone(), Some(user_id), command("acme", "First"))
            .await
            .unwrap();
        let result = handle(pool.clone(), Some(user_id), command("acme", "Second")).await;
        assert!(matches!(
            result,
            Err(CreateOrganizationError::DuplicateSlug(_))
        ));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_anonymous_creation_rejected(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool.clone(), None, command("acme", "Acme Inc")).await;
        assert!(matches!(result, Err(CreateOrganizationError::Unauthenticated)));

        // Nothing half-created
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);
        Ok(())
    }
}
