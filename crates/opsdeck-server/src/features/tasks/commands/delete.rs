//! Delete task command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::audited_delete;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::queries::get::fetch_scoped;

/// Response from deleting a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Errors that can occur when deleting a task
#[derive(Debug, thiserror::Error)]
pub enum DeleteTaskError {
    #[error("Task '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteTaskError> for AppError {
    fn from(err: DeleteTaskError) -> Self {
        match err {
            DeleteTaskError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteTaskError::MissingTenant => AppError::Forbidden(err.to_string()),
            DeleteTaskError::Database(e) => AppError::Database(e),
        }
    }
}

/// Handler function for deleting tasks
#[tracing::instrument(skip(pool, ctx))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    task_id: Uuid,
) -> Result<DeleteTaskResponse, DeleteTaskError> {
    let organization_id = ctx.organization_id().ok_or(DeleteTaskError::MissingTenant)?;

    let task = fetch_scoped(&pool, organization_id, task_id)
        .await?
        .ok_or(DeleteTaskError::NotFound(task_id))?;

    audited_delete(&pool, &ctx, &task, async {
        sqlx::query("DELETE FROM tasks WHERE id = $1 AND organization_id = $2")
            .bind(task_id)
            .bind(organization_id)
            .execute(&pool)
            .await
            .map(|_| ())
    })
    .await?;

    tracing::info!(task_id = %task_id, "Task deleted");

    Ok(DeleteTaskResponse {
        id: task_id,
        deleted: true,
    })
}
