//! Delete task comment command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::audited_delete;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::types::TaskComment;

/// Response from deleting a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Errors that can occur when deleting a comment
#[derive(Debug, thiserror::Error)]
pub enum DeleteCommentError {
    #[error("Comment '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteCommentError> for AppError {
    fn from(err: DeleteCommentError) -> Self {
        match err {
            DeleteCommentError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteCommentError::MissingTenant => AppError::Forbidden(err.to_string()),
            DeleteCommentError::Database(e) => AppError::Database(e),
        }
    }
}

/// Handler function for deleting comments
#[tracing::instrument(skip(pool, ctx))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    comment_id: Uuid,
) -> Result<DeleteCommentResponse, DeleteCommentError> {
    let organization_id = ctx
        .organization_id()
        .ok_or(DeleteCommentError::MissingTenant)?;

    // Scoped through the parent task; a foreign comment id is a miss.
    let comment = sqlx::query_as::<_, TaskComment>(
        r#"
        SELECT c.id, c.task_id, c.author_id, c.body, c.created_at, c.updated_at,
               t.organization_id AS task_organization_id
        FROM task_comments c
        JOIN tasks t ON t.id = c.task_id
        WHERE c.id = $1 AND t.organization_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(organization_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteCommentError::NotFound(comment_id))?;

    audited_delete(&pool, &ctx, &comment, async {
        sqlx::query("DELETE FROM task_comments WHERE id = $1")
            .bind(comment_id)
            .execute(&pool)
            .await
            .map(|_| ())
    })
    .await?;

    tracing::info!(comment_id = %comment_id, "Comment deleted");

    Ok(DeleteCommentResponse {
        id: comment_id,
        deleted: true,
    })
}
