//! List invoices query

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

use super::super::types::Invoice;

/// Optional filters for the invoice listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInvoicesQuery {
    pub status: Option<String>,
}

/// Handler function listing the current organization's invoices
#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    organization_id: Uuid,
    query: ListInvoicesQuery,
) -> AppResult<Vec<Invoice>> {
    let invoices = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, organization_id, number, client_name, client_email,
               issue_date, due_date, status, total_amount, created_at, updated_at
        FROM invoices
        WHERE organization_id = $1
          AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(organization_id)
    .bind(query.status.as_deref())
    .fetch_all(&pool)
    .await?;

    Ok(invoices)
}
