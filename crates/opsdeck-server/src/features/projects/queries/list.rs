//! List projects query

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

use super::super::types::Project;

/// Handler function listing the current organization's projects
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, organization_id: Uuid) -> AppResult<Vec<Project>> {
    let projects = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, organization_id, name, description, owner_id, status,
               start_date, end_date, created_at, updated_at
        FROM projects
        WHERE organization_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(organization_id)
    .fetch_all(&pool)
    .await?;

    Ok(projects)
}
