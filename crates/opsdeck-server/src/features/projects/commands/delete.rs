//! Delete project command
//!
//! The field snapshot is captured before the row is deleted; the audit
//! entry records it as `before` with a null `after`.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::audited_delete;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::queries::get::fetch_scoped;

/// Response from deleting a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProjectResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Errors that can occur when deleting a project
#[derive(Debug, thiserror::Error)]
pub enum DeleteProjectError {
    #[error("Project '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteProjectError> for AppError {
    fn from(err: DeleteProjectError) -> Self {
        match err {
            DeleteProjectError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteProjectError::MissingTenant => AppError::Forbidden(err.to_string()),
            DeleteProjectError::Database(e) => AppError::Database(e),
        }
    }
}

/// Handler function for deleting projects
#[tracing::instrument(skip(pool, ctx))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    project_id: Uuid,
) -> Result<DeleteProjectResponse, DeleteProjectError> {
    let organization_id = ctx
        .organization_id()
        .ok_or(DeleteProjectError::MissingTenant)?;

    let project = fetch_scoped(&pool, organization_id, project_id)
        .await?
        .ok_or(DeleteProjectError::NotFound(project_id))?;

    audited_delete(&pool, &ctx, &project, async {
        sqlx::query("DELETE FROM projects WHERE id = $1 AND organization_id = $2")
            .bind(project_id)
            .bind(organization_id)
            .execute(&pool)
            .await
            .map(|_| ())
    })
    .await?;

    tracing::info!(project_id = %project_id, "Project deleted");

    Ok(DeleteProjectResponse {
        id: project_id,
        deleted: true,
    })
}
