//! Create task command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::{TaskPriority, TaskStatus};

use crate::audit::audited_create;
use crate::error::AppError;
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::tenancy::RequestContext;

use super::super::types::Task;

/// Command to create a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskCommand {
    pub project_id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Defaults to `todo`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<chrono::NaiveDate>,

    /// Defaults to `medium`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

/// Errors that can occur when creating a task
#[derive(Debug, thiserror::Error)]
pub enum CreateTaskError {
    #[error("Title validation failed: {0}")]
    TitleValidation(#[from] NameValidationError),

    #[error("'{0}' is not a valid task status")]
    InvalidStatus(String),

    #[error("'{0}' is not a valid task priority")]
    InvalidPriority(String),

    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateTaskError> for AppError {
    fn from(err: CreateTaskError) -> Self {
        match err {
            CreateTaskError::TitleValidation(_)
            | CreateTaskError::InvalidStatus(_)
            | CreateTaskError::InvalidPriority(_) => AppError::Validation(err.to_string()),
            CreateTaskError::ProjectNotFound(_) => AppError::NotFound(err.to_string()),
            CreateTaskError::MissingTenant => AppError::Forbidden(err.to_string()),
            CreateTaskError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateTaskCommand {
    /// Validates the command, returning the parsed status and priority
    pub fn validate(&self) -> Result<(TaskStatus, TaskPriority), CreateTaskError> {
        validate_name(&self.title, "title", 255)?;
        let status = match &self.status {
            Some(status) => status
                .parse()
                .map_err(|_| CreateTaskError::InvalidStatus(status.clone()))?,
            None => TaskStatus::default(),
        };
        let priority = match &self.priority {
            Some(priority) => priority
                .parse()
                .map_err(|_| CreateTaskError::InvalidPriority(priority.clone()))?,
            None => TaskPriority::default(),
        };
        Ok((status, priority))
    }
}

/// Handler function for creating tasks
///
/// The referenced project must belong to the current organization; a
/// foreign project id behaves like a missing one.
#[tracing::instrument(skip(pool, ctx, command), fields(title = %command.title))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    command: CreateTaskCommand,
) -> Result<Task, CreateTaskError> {
    let (status, priority) = command.validate()?;

    let organization_id = ctx.organization_id().ok_or(CreateTaskError::MissingTenant)?;

    let project_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1 AND organization_id = $2)",
    )
    .bind(command.project_id)
    .bind(organization_id)
    .fetch_one(&pool)
    .await?;
    if !project_exists {
        return Err(CreateTaskError::ProjectNotFound(command.project_id));
    }

    let task = audited_create(&pool, &ctx, async {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (organization_id, project_id, title, description, status,
                               assignee_id, due_date, priority, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, organization_id, project_id, title, description, status,
                      assignee_id, due_date, priority, sort_order, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(command.project_id)
        .bind(&command.title)
        .bind(&command.description)
        .bind(status.as_str())
        .bind(command.assignee_id)
        .bind(command.due_date)
        .bind(priority.as_str())
        .bind(command.sort_order)
        .fetch_one(&pool)
        .await
    })
    .await?;

    tracing::info!(task_id = %task.id, "Task created");

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(title: &str) -> CreateTaskCommand {
        CreateTaskCommand {
            project_id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            status: None,
            assignee_id: None,
            due_date: None,
            priority: None,
            sort_order: 0,
        }
    }

    #[test]
    fn test_validation_defaults() {
        let (status, priority) = command("Ship it").validate().unwrap();
        assert_eq!(status, TaskStatus::Todo);
        assert_eq!(priority, TaskPriority::Medium);
    }

    #[test]
    fn test_validation_rejects_unknown_priority() {
        let cmd = CreateTaskCommand {
            priority: Some("urgent".to_string()),
            ..command("Ship it")
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateTaskError::InvalidPriority(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_title() {
        assert!(matches!(
            command("").validate(),
            Err(CreateTaskError::TitleValidation(_))
        ));
    }
}
