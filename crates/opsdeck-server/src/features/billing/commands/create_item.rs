//! Create invoice item command
//!
//! The insert and the total recompute form one atomic unit: the invoice row
//! is locked, the item is written, and the total is recomputed before the
//! transaction commits. A failed recompute aborts the whole unit. The audit
//! entry is recorded after commit, from the row the transaction returned.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::audit::audited_create;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::queries::get_invoice::fetch_scoped;
use super::super::totals::{lock_invoice, recompute_invoice_total};
use super::super::types::InvoiceItem;

/// Command to add a line item to an invoice
///
/// `unit_price` travels as a string to keep the decimal exact end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemCommand {
    pub description: String,

    #[serde(default = "default_quantity")]
    pub quantity: i32,

    pub unit_price: String,
}

fn default_quantity() -> i32 {
    1
}

/// Errors that can occur when creating an invoice item
#[derive(Debug, thiserror::Error)]
pub enum CreateItemError {
    #[error("Description is required and cannot be empty")]
    DescriptionRequired,

    #[error("Quantity must be a positive integer")]
    InvalidQuantity,

    #[error("'{0}' is not a valid non-negative decimal price")]
    InvalidPrice(String),

    #[error("Invoice '{0}' not found")]
    InvoiceNotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateItemError> for AppError {
    fn from(err: CreateItemError) -> Self {
        match err {
            CreateItemError::DescriptionRequired
            | CreateItemError::InvalidQuantity
            | CreateItemError::InvalidPrice(_) => AppError::Validation(err.to_string()),
            CreateItemError::InvoiceNotFound(_) => AppError::NotFound(err.to_string()),
            CreateItemError::MissingTenant => AppError::Forbidden(err.to_string()),
            CreateItemError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateItemCommand {
    /// Validates the command, returning the parsed unit price
    pub fn validate(&self) -> Result<BigDecimal, CreateItemError> {
        if self.description.trim().is_empty() {
            return Err(CreateItemError::DescriptionRequired);
        }
        if self.quantity < 1 {
            return Err(CreateItemError::InvalidQuantity);
        }
        let price = BigDecimal::from_str(&self.unit_price)
            .map_err(|_| CreateItemError::InvalidPrice(self.unit_price.clone()))?;
        if price < BigDecimal::from(0) {
            return Err(CreateItemError::InvalidPrice(self.unit_price.clone()));
        }
        Ok(price)
    }
}

/// Handler function for creating invoice items
#[tracing::instrument(skip(pool, ctx, command))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    invoice_id: Uuid,
    command: CreateItemCommand,
) -> Result<InvoiceItem, CreateItemError> {
    let unit_price = command.validate()?;

    let organization_id = ctx.organization_id().ok_or(CreateItemError::MissingTenant)?;

    let invoice = fetch_scoped(&pool, organization_id, invoice_id)
        .await?
        .ok_or(CreateItemError::InvoiceNotFound(invoice_id))?;

    let item = audited_create(&pool, &ctx, async {
        let mut tx = pool.begin().await?;

        lock_invoice(&mut tx, invoice.id).await?;

        let item = sqlx::query_as::<_, InvoiceItem>(
            r#"
            WITH new_item AS (
                INSERT INTO invoice_items (invoice_id, description, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                RETURNING id, invoice_id, description, quantity, unit_price,
                          created_at, updated_at
            )
            SELECT n.id, n.invoice_id, n.description, n.quantity, n.unit_price,
                   n.created_at, n.updated_at,
                   i.organization_id AS invoice_organization_id
            FROM new_item n
            JOIN invoices i ON i.id = n.invoice_id
            "#,
        )
        .bind(invoice.id)
        .bind(command.description.trim())
        .bind(command.quantity)
        .bind(&unit_price)
        .fetch_one(&mut *tx)
        .await?;

        recompute_invoice_total(&mut tx, invoice.id).await?;

        tx.commit().await?;

        Ok(item)
    })
    .await?;

    tracing::info!(item_id = %item.id, invoice_id = %invoice.id, "Invoice item created");

    Ok(item)
}
