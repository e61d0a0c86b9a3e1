//! Update project command
//!
//! Partial update. The pre-image is loaded and snapshotted strictly before
//! the write; the recorded audit entry carries both states.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::ProjectStatus;

use crate::audit::audited_update;
use crate::error::AppError;
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::tenancy::RequestContext;

use super::super::queries::get::fetch_scoped;
use super::super::types::Project;

/// Command to update an existing project; absent fields stay unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProjectCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
}

/// Errors that can occur when updating a project
#[derive(Debug, thiserror::Error)]
pub enum UpdateProjectError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("'{0}' is not a valid project status")]
    InvalidStatus(String),

    #[error("Project '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateProjectError> for AppError {
    fn from(err: UpdateProjectError) -> Self {
        match err {
            UpdateProjectError::NoFieldsToUpdate
            | UpdateProjectError::NameValidation(_)
            | UpdateProjectError::InvalidStatus(_) => AppError::Validation(err.to_string()),
            UpdateProjectError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateProjectError::MissingTenant => AppError::Forbidden(err.to_string()),
            UpdateProjectError::Database(e) => AppError::Database(e),
        }
    }
}

impl UpdateProjectCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), UpdateProjectError> {
        if self.name.is_none()
            && self.description.is_none()
            && self.owner_id.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
        {
            return Err(UpdateProjectError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "name", 255)?;
        }
        if let Some(ref status) = self.status {
            status
                .parse::<ProjectStatus>()
                .map_err(|_| UpdateProjectError::InvalidStatus(status.clone()))?;
        }
        Ok(())
    }
}

/// Handler function for updating projects
#[tracing::instrument(skip(pool, ctx, command))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    project_id: Uuid,
    command: UpdateProjectCommand,
) -> Result<Project, UpdateProjectError> {
    command.validate()?;

    let organization_id = ctx
        .organization_id()
        .ok_or(UpdateProjectError::MissingTenant)?;

    let existing = fetch_scoped(&pool, organization_id, project_id)
        .await?
        .ok_or(UpdateProjectError::NotFound(project_id))?;

    let name = command.name.unwrap_or_else(|| existing.name.clone());
    let description = command
        .description
        .unwrap_or_else(|| existing.description.clone());
    let owner_id = command.owner_id.or(existing.owner_id);
    let status = command.status.unwrap_or_else(|| existing.status.clone());
    let start_date = command.start_date.or(existing.start_date);
    let end_date = command.end_date.or(existing.end_date);

    let project = audited_update(&pool, &ctx, &existing, async {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $3, description = $4, owner_id = $5, status = $6,
                start_date = $7, end_date = $8, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, name, description, owner_id, status,
                      start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(organization_id)
        .bind(&name)
        .bind(&description)
        .bind(owner_id)
        .bind(&status)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&pool)
        .await
    })
    .await?;

    tracing::info!(project_id = %project.id, "Project updated");

    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_rejected() {
        assert!(matches!(
            UpdateProjectCommand::default().validate(),
            Err(UpdateProjectError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_status_validated_when_present() {
        let cmd = UpdateProjectCommand {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cmd.validate(),
            Err(UpdateProjectError::InvalidStatus(_))
        ));

        let cmd = UpdateProjectCommand {
            status: Some("on_hold".to_string()),
            ..Default::default()
        };
        assert!(cmd.validate().is_ok());
    }
}
