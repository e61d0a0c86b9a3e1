//! List tasks query

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

use super::super::types::Task;

/// Optional filters for the task listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Handler function listing the current organization's tasks
///
/// Ordered by board position, then recency.
#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    organization_id: Uuid,
    query: ListTasksQuery,
) -> AppResult<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, organization_id, project_id, title, description, status,
               assignee_id, due_date, priority, sort_order, created_at, updated_at
        FROM tasks
        WHERE organization_id = $1
          AND ($2::UUID IS NULL OR project_id = $2)
          AND ($3::TEXT IS NULL OR status = $3)
        ORDER BY sort_order, created_at DESC
        "#,
    )
    .bind(organization_id)
    .bind(query.project_id)
    .bind(query.status.as_deref())
    .fetch_all(&pool)
    .await?;

    Ok(tasks)
}
