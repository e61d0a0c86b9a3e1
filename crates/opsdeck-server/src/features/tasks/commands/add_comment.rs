//! Add task comment command
//!
//! Comments are audited like any other mutation. Their owning tenant is
//! resolved through the parent task, so the insert returns the row joined
//! with the task's organization reference.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::audited_create;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::types::TaskComment;

/// Command to comment on a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentCommand {
    pub body: String,
}

/// Errors that can occur when adding a comment
#[derive(Debug, thiserror::Error)]
pub enum AddCommentError {
    #[error("Comment body cannot be empty")]
    EmptyBody,

    #[error("Task '{0}' not found")]
    TaskNotFound(Uuid),

    #[error("An authenticated user is required to comment")]
    Unauthenticated,

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AddCommentError> for AppError {
    fn from(err: AddCommentError) -> Self {
        match err {
            AddCommentError::EmptyBody => AppError::Validation(err.to_string()),
            AddCommentError::TaskNotFound(_) => AppError::NotFound(err.to_string()),
            AddCommentError::Unauthenticated => AppError::Unauthorized(err.to_string()),
            AddCommentError::MissingTenant => AppError::Forbidden(err.to_string()),
            AddCommentError::Database(e) => AppError::Database(e),
        }
    }
}

impl AddCommentCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), AddCommentError> {
        if self.body.trim().is_empty() {
            return Err(AddCommentError::EmptyBody);
        }
        Ok(())
    }
}

/// Handler function for adding comments; the acting user is the author
#[tracing::instrument(skip(pool, ctx, command))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    task_id: Uuid,
    command: AddCommentCommand,
) -> Result<TaskComment, AddCommentError> {
    command.validate()?;

    let organization_id = ctx.organization_id().ok_or(AddCommentError::MissingTenant)?;
    let author_id = ctx.user_id.ok_or(AddCommentError::Unauthenticated)?;

    let task_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1 AND organization_id = $2)",
    )
    .bind(task_id)
    .bind(organization_id)
    .fetch_one(&pool)
    .await?;
    if !task_exists {
        return Err(AddCommentError::TaskNotFound(task_id));
    }

    let comment = audited_create(&pool, &ctx, async {
        sqlx::query_as::<_, TaskComment>(
            r#"
            WITH new_comment AS (
                INSERT INTO task_comments (task_id, author_id, body)
                VALUES ($1, $2, $3)
                RETURNING id, task_id, author_id, body, created_at, updated_at
            )
            SELECT c.id, c.task_id, c.author_id, c.body, c.created_at, c.updated_at,
                   t.organization_id AS task_organization_id
            FROM new_comment c
            JOIN tasks t ON t.id = c.task_id
            "#,
        )
        .bind(task_id)
        .bind(author_id)
        .bind(command.body.trim())
        .fetch_one(&pool)
        .await
    })
    .await?;

    tracing::info!(comment_id = %comment.id, task_id = %task_id, "Comment added");

    Ok(comment)
}
