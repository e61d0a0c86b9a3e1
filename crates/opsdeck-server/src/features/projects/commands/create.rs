//! Create project command
//!
//! Creates a project in the current organization and records one create
//! audit entry from the resulting row. When the command names no owner, the
//! acting user becomes the owner.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::ProjectStatus;

use crate::audit::audited_create;
use crate::error::AppError;
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::tenancy::RequestContext;

use super::super::types::Project;

/// Command to create a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectCommand {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Defaults to the acting user when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,

    /// Defaults to `planned`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
}

/// Errors that can occur when creating a project
#[derive(Debug, thiserror::Error)]
pub enum CreateProjectError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("'{0}' is not a valid project status")]
    InvalidStatus(String),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateProjectError> for AppError {
    fn from(err: CreateProjectError) -> Self {
        match err {
            CreateProjectError::NameValidation(_) | CreateProjectError::InvalidStatus(_) => {
                AppError::Validation(err.to_string())
            },
            CreateProjectError::MissingTenant => AppError::Forbidden(err.to_string()),
            CreateProjectError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateProjectCommand {
    /// Validates the command, returning the parsed status
    pub fn validate(&self) -> Result<ProjectStatus, CreateProjectError> {
        validate_name(&self.name, "name", 255)?;
        match &self.status {
            Some(status) => status
                .parse()
                .map_err(|_| CreateProjectError::InvalidStatus(status.clone())),
            None => Ok(ProjectStatus::default()),
        }
    }
}

/// Handler function for creating projects
#[tracing::instrument(skip(pool, ctx, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    command: CreateProjectCommand,
) -> Result<Project, CreateProjectError> {
    let status = command.validate()?;

    let organization_id = ctx
        .organization_id()
        .ok_or(CreateProjectError::MissingTenant)?;
    let owner_id = command.owner_id.or(ctx.user_id);

    let project = audited_create(&pool, &ctx, async {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (organization_id, name, description, owner_id, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organization_id, name, description, owner_id, status,
                      start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&command.name)
        .bind(&command.description)
        .bind(owner_id)
        .bind(status.as_str())
        .bind(command.start_date)
        .bind(command.end_date)
        .fetch_one(&pool)
        .await
    })
    .await?;

    tracing::info!(project_id = %project.id, "Project created");

    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str) -> CreateProjectCommand {
        CreateProjectCommand {
            name: name.to_string(),
            description: String::new(),
            owner_id: None,
            status: None,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn test_validation_defaults_status_to_planned() {
        assert_eq!(command("Relaunch").validate().unwrap(), ProjectStatus::Planned);
    }

    #[test]
    fn test_validation_rejects_unknown_status() {
        let cmd = CreateProjectCommand {
            status: Some("cancelled".to_string()),
            ..command("Relaunch")
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateProjectError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        assert!(matches!(
            command("   ").validate(),
            Err(CreateProjectError::NameValidation(_))
        ));
    }
}
