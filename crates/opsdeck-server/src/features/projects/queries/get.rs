//! Get project query

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::super::types::Project;

/// Fetch one project scoped to an organization
///
/// Scoping happens in the query itself: an id belonging to another tenant
/// behaves exactly like an id that does not exist.
pub async fn fetch_scoped(
    pool: &PgPool,
    organization_id: Uuid,
    project_id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, organization_id, name, description, owner_id, status,
               start_date, end_date, created_at, updated_at
        FROM projects
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(project_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// Handler function for retrieving a project
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, organization_id: Uuid, project_id: Uuid) -> AppResult<Project> {
    fetch_scoped(&pool, organization_id, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project '{}' not found", project_id)))
}
