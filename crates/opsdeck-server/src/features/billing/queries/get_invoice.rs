//! Get invoice query

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::super::types::{Invoice, InvoiceItem};

/// Invoice with its line items embedded
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// Fetch one invoice scoped to an organization
pub async fn fetch_scoped(
    pool: &PgPool,
    organization_id: Uuid,
    invoice_id: Uuid,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, organization_id, number, client_name, client_email,
               issue_date, due_date, status, total_amount, created_at, updated_at
        FROM invoices
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(invoice_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// Fetch the line items of an invoice, joined with the owning tenant
pub async fn fetch_items(
    pool: &PgPool,
    invoice_id: Uuid,
) -> Result<Vec<InvoiceItem>, sqlx::Error> {
    sqlx::query_as::<_, InvoiceItem>(
        r#"
        SELECT ii.id, ii.invoice_id, ii.description, ii.quantity, ii.unit_price,
               ii.created_at, ii.updated_at,
               i.organization_id AS invoice_organization_id
        FROM invoice_items ii
        JOIN invoices i ON i.id = ii.invoice_id
        WHERE ii.invoice_id = $1
        ORDER BY ii.created_at
        "#,
    )
    .bind(invoice_id)
    .fetch_all(pool)
    .await
}

/// Handler function retrieving an invoice with its items
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    organization_id: Uuid,
    invoice_id: Uuid,
) -> AppResult<InvoiceDetail> {
    let invoice = fetch_scoped(&pool, organization_id, invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invoice '{}' not found", invoice_id)))?;

    let items = fetch_items(&pool, invoice.id).await?;

    Ok(InvoiceDetail { invoice, items })
}
