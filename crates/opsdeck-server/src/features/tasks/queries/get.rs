//! Get task query

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::super::types::Task;

/// Fetch one task scoped to an organization
pub async fn fetch_scoped(
    pool: &PgPool,
    organization_id: Uuid,
    task_id: Uuid,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        r#"
        SELECT id, organization_id, project_id, title, description, status,
               assignee_id, due_date, priority, sort_order, created_at, updated_at
        FROM tasks
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(task_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// Handler function for retrieving a task
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, organization_id: Uuid, task_id: Uuid) -> AppResult<Task> {
    fetch_scoped(&pool, organization_id, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task '{}' not found", task_id)))
}
