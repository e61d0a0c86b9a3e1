//! List task comments query

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::super::types::TaskComment;

/// Handler function listing a task's comments, oldest first
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    organization_id: Uuid,
    task_id: Uuid,
) -> AppResult<Vec<TaskComment>> {
    let task_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1 AND organization_id = $2)",
    )
    .bind(task_id)
    .bind(organization_id)
    .fetch_one(&pool)
    .await?;
    if !task_exists {
        return Err(AppError::NotFound(format!("Task '{}' not found", task_id)));
    }

    let comments = sqlx::query_as::<_, TaskComment>(
        r#"
        SELECT c.id, c.task_id, c.author_id, c.body, c.created_at, c.updated_at,
               t.organization_id AS task_organization_id
        FROM task_comments c
        JOIN tasks t ON t.id = c.task_id
        WHERE c.task_id = $1
        ORDER BY c.created_at
        "#,
    )
    .bind(task_id)
    .fetch_all(&pool)
    .await?;

    Ok(comments)
}
