//! Update invoice item command
//!
//! The pre-image is snapshotted before the write; the write and the total
//! recompute share one locked transaction.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::audit::audited_update;
use crate::error::AppError;
use crate::tenancy::RequestContext;

use super::super::queries::items::fetch_item_scoped;
use super::super::totals::{lock_invoice, recompute_invoice_total};
use super::super::types::InvoiceItem;

/// Command to update a line item; absent fields stay unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateItemCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
}

/// Errors that can occur when updating an invoice item
#[derive(Debug, thiserror::Error)]
pub enum UpdateItemError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("Description cannot be empty")]
    DescriptionRequired,

    #[error("Quantity must be a positive integer")]
    InvalidQuantity,

    #[error("'{0}' is not a valid non-negative decimal price")]
    InvalidPrice(String),

    #[error("Invoice item '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateItemError> for AppError {
    fn from(err: UpdateItemError) -> Self {
        match err {
            UpdateItemError::NoFieldsToUpdate
            | UpdateItemError::DescriptionRequired
            | UpdateItemError::InvalidQuantity
            | UpdateItemError::InvalidPrice(_) => AppError::Validation(err.to_string()),
            UpdateItemError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateItemError::MissingTenant => AppError::Forbidden(err.to_string()),
            UpdateItemError::Database(e) => AppError::Database(e),
        }
    }
}

impl UpdateItemCommand {
    /// Validates the command, returning the parsed unit price when given
    pub fn validate(&self) -> Result<Option<BigDecimal>, UpdateItemError> {
        if self.description.is_none() && self.quantity.is_none() && self.unit_price.is_none() {
            return Err(UpdateItemError::NoFieldsToUpdate);
        }
        if let Some(ref description) = self.description {
            if description.trim().is_empty() {
                return Err(UpdateItemError::DescriptionRequired);
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                return Err(UpdateItemError::InvalidQuantity);
            }
        }
        match &self.unit_price {
            Some(raw) => {
                let price = BigDecimal::from_str(raw)
                    .map_err(|_| UpdateItemError::InvalidPrice(raw.clone()))?;
                if price < BigDecimal::from(0) {
                    return Err(UpdateItemError::InvalidPrice(raw.clone()));
                }
                Ok(Some(price))
            },
            None => Ok(None),
        }
    }
}

/// Handler function for updating invoice items
#[tracing::instrument(skip(pool, ctx, command))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    item_id: Uuid,
    command: UpdateItemCommand,
) -> Result<InvoiceItem, UpdateItemError> {
    let parsed_price = command.validate()?;

    let organization_id = ctx.organization_id().ok_or(UpdateItemError::MissingTenant)?;

    let existing = fetch_item_scoped(&pool, organization_id, item_id)
        .await?
        .ok_or(UpdateItemError::NotFound(item_id))?;

    let description = command
        .description
        .as_deref()
        .map(|d| d.trim().to_string())
        .unwrap_or_else(|| existing.description.clone());
    let quantity = command.quantity.unwrap_or(existing.quantity);
    let unit_price = parsed_price.unwrap_or_else(|| existing.unit_price.clone());
    let invoice_id = existing.invoice_id;

    let item = audited_update(&pool, &ctx, &existing, async {
        let mut tx = pool.begin().await?;

        lock_invoice(&mut tx, invoice_id).await?;

        let item = sqlx::query_as::<_, InvoiceItem>(
            r#"
            WITH updated AS (
                UPDATE invoice_items
                SET description = $2, quantity = $3, unit_price = $4, updated_at = NOW()
                WHERE id = $1
                RETURNING id, invoice_id, description, quantity, unit_price,
                          created_at, updated_at
            )
            SELECT u.id, u.invoice_id, u.description, u.quantity, u.unit_price,
                   u.created_at, u.updated_at,
                   i.organization_id AS invoice_organization_id
            FROM updated u
            JOIN invoices i ON i.id = u.invoice_id
            "#,
        )
        .bind(item_id)
        .bind(&description)
        .bind(quantity)
        .bind(&unit_price)
        .fetch_one(&mut *tx)
        .await?;

        recompute_invoice_total(&mut tx, invoice_id).await?;

        tx.commit().await?;

        Ok(item)
    })
    .await?;

    tracing::info!(item_id = %item.id, invoice_id = %invoice_id, "Invoice item updated");

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_rejected() {
        assert!(matches!(
            UpdateItemCommand::default().validate(),
            Err(UpdateItemError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_price_validated_when_present() {
        let cmd = UpdateItemCommand {
            unit_price: Some("-1.00".to_string()),
            ..Default::default()
        };
        assert!(matches!(cmd.validate(), Err(UpdateItemError::InvalidPrice(_))));

        let cmd = UpdateItemCommand {
            quantity: Some(3),
            unit_price: Some("12.50".to_string()),
            ..Default::default()
        };
        assert_eq!(
            cmd.validate().unwrap(),
            Some(BigDecimal::from_str("12.50").unwrap())
        );
    }
}
