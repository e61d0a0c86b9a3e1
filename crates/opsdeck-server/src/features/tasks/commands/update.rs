//! Update task command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::{TaskPriority, TaskStatus};

use crate::audit::audited_update;
use crate::error::AppError;
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::tenancy::RequestContext;

use super::super::queries::get::fetch_scoped;
use super::super::types::Task;

/// Command to update an existing task; absent fields stay unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTaskCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

/// Errors that can occur when updating a task
#[derive(Debug, thiserror::Error)]
pub enum UpdateTaskError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("Title validation failed: {0}")]
    TitleValidation(#[from] NameValidationError),

    #[error("'{0}' is not a valid task status")]
    InvalidStatus(String),

    #[error("'{0}' is not a valid task priority")]
    InvalidPriority(String),

    #[error("Task '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateTaskError> for AppError {
    fn from(err: UpdateTaskError) -> Self {
        match err {
            UpdateTaskError::NoFieldsToUpdate
            | UpdateTaskError::TitleValidation(_)
            | UpdateTaskError::InvalidStatus(_)
            | UpdateTaskError::InvalidPriority(_) => AppError::Validation(err.to_string()),
            UpdateTaskError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateTaskError::MissingTenant => AppError::Forbidden(err.to_string()),
            UpdateTaskError::Database(e) => AppError::Database(e),
        }
    }
}

impl UpdateTaskCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), UpdateTaskError> {
        if self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.sort_order.is_none()
        {
            return Err(UpdateTaskError::NoFieldsToUpdate);
        }
        if let Some(ref title) = self.title {
            validate_name(title, "title", 255)?;
        }
        if let Some(ref status) = self.status {
            status
                .parse::<TaskStatus>()
                .map_err(|_| UpdateTaskError::InvalidStatus(status.clone()))?;
        }
        if let Some(ref priority) = self.priority {
            priority
                .parse::<TaskPriority>()
                .map_err(|_| UpdateTaskError::InvalidPriority(priority.clone()))?;
        }
        Ok(())
    }
}

/// Handler function for updating tasks
#[tracing::instrument(skip(pool, ctx, command))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    task_id: Uuid,
    command: UpdateTaskCommand,
) -> Result<Task, UpdateTaskError> {
    command.validate()?;

    let organization_id = ctx.organization_id().ok_or(UpdateTaskError::MissingTenant)?;

    let existing = fetch_scoped(&pool, organization_id, task_id)
        .await?
        .ok_or(UpdateTaskError::NotFound(task_id))?;

    let title = command.title.unwrap_or_else(|| existing.title.clone());
    let description = command
        .description
        .unwrap_or_else(|| existing.description.clone());
    let status = command.status.unwrap_or_else(|| existing.status.clone());
    let assignee_id = command.assignee_id.or(existing.assignee_id);
    let due_date = command.due_date.or(existing.due_date);
    let priority = command.priority.unwrap_or_else(|| existing.priority.clone());
    let sort_order = command.sort_order.unwrap_or(existing.sort_order);

    let task = audited_update(&pool, &ctx, &existing, async {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, status = $5, assignee_id = $6,
                due_date = $7, priority = $8, sort_order = $9, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, project_id, title, description, status,
                      assignee_id, due_date, priority, sort_order, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(organization_id)
        .bind(&title)
        .bind(&description)
        .bind(&status)
        .bind(assignee_id)
        .bind(due_date)
        .bind(&priority)
        .bind(sort_order)
        .fetch_one(&pool)
        .await
    })
    .await?;

    tracing::info!(task_id = %task.id, "Task updated");

    Ok(task)
}
