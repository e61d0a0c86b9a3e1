//! Delete invoice item command
//!
//! The snapshot is taken before the row disappears; the delete and the
//! total recompute share one locked transaction.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::audited_delete;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::queries::items::fetch_item_scoped;
use super::super::totals::{lock_invoice, recompute_invoice_total};

/// Response from deleting an invoice item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteItemResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Errors that can occur when deleting an invoice item
#[derive(Debug, thiserror::Error)]
pub enum DeleteItemError {
    #[error("Invoice item '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteItemError> for AppError {
    fn from(err: DeleteItemError) -> Self {
        match err {
            DeleteItemError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteItemError::MissingTenant => AppError::Forbidden(err.to_string()),
            DeleteItemError::Database(e) => AppError::Database(e),
        }
    }
}

/// Handler function for deleting invoice items
#[tracing::instrument(skip(pool, ctx))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    item_id: Uuid,
) -> Result<DeleteItemResponse, DeleteItemError> {
    let organization_id = ctx.organization_id().ok_or(DeleteItemError::MissingTenant)?;

    let item = fetch_item_scoped(&pool, organization_id, item_id)
        .await?
        .ok_or(DeleteItemError::NotFound(item_id))?;
    let invoice_id = item.invoice_id;

    audited_delete(&pool, &ctx, &item, async {
        let mut tx = pool.begin().await?;

        lock_invoice(&mut tx, invoice_id).await?;

        sqlx::query("DELETE FROM invoice_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        recompute_invoice_total(&mut tx, invoice_id).await?;

        tx.commit().await?;

        Ok(())
    })
    .await?;

    tracing::info!(item_id = %item_id, invoice_id = %invoice_id, "Invoice item deleted");

    Ok(DeleteItemResponse {
        id: item_id,
        deleted: true,
    })
}
