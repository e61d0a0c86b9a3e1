//! Delete invoice command
//!
//! Line items cascade in the schema; the audit entry covers the invoice
//! itself, snapshotted before the delete executes.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::audited_delete;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::queries::get_invoice::fetch_scoped;

/// Response from deleting an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteInvoiceResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Errors that can occur when deleting an invoice
#[derive(Debug, thiserror::Error)]
pub enum DeleteInvoiceError {
    #[error("Invoice '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteInvoiceError> for AppError {
    fn from(err: DeleteInvoiceError) -> Self {
        match err {
            DeleteInvoiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteInvoiceError::MissingTenant => AppError::Forbidden(err.to_string()),
            DeleteInvoiceError::Database(e) => AppError::Database(e),
        }
    }
}

/// Handler function for deleting invoices
#[tracing::instrument(skip(pool, ctx))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    invoice_id: Uuid,
) -> Result<DeleteInvoiceResponse, DeleteInvoiceError> {
    let organization_id = ctx
        .organization_id()
        .ok_or(DeleteInvoiceError::MissingTenant)?;

    let invoice = fetch_scoped(&pool, organization_id, invoice_id)
        .await?
        .ok_or(DeleteInvoiceError::NotFound(invoice_id))?;

    audited_delete(&pool, &ctx, &invoice, async {
        sqlx::query("DELETE FROM invoices WHERE id = $1 AND organization_id = $2")
            .bind(invoice_id)
            .bind(organization_id)
            .execute(&pool)
            .await
            .map(|_| ())
    })
    .await?;

    tracing::info!(invoice_id = %invoice_id, "Invoice deleted");

    Ok(DeleteInvoiceResponse {
        id: invoice_id,
        deleted: true,
    })
}
