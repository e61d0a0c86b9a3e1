//! Update invoice command
//!
//! Partial update of the invoice header. The derived total is never
//! client-writable; it only moves through line-item mutations.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_common::types::InvoiceStatus;

use crate::audit::audited_update;
use crate::error::AppError;
use crate::features::shared::validation::{
    validate_email, validate_name, EmailValidationError, NameValidationError,
};
use crate::tenancy::RequestContext;

use super::super::queries::get_invoice::fetch_scoped;
use super::super::types::Invoice;

/// Command to update an existing invoice; absent fields stay unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateInvoiceCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Errors that can occur when updating an invoice
#[derive(Debug, thiserror::Error)]
pub enum UpdateInvoiceError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("Client name validation failed: {0}")]
    ClientNameValidation(#[from] NameValidationError),

    #[error("Client email validation failed: {0}")]
    ClientEmailValidation(#[from] EmailValidationError),

    #[error("'{0}' is not a valid invoice status")]
    InvalidStatus(String),

    #[error("Invoice '{0}' not found")]
    NotFound(Uuid),

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateInvoiceError> for AppError {
    fn from(err: UpdateInvoiceError) -> Self {
        match err {
            UpdateInvoiceError::NoFieldsToUpdate
            | UpdateInvoiceError::ClientNameValidation(_)
            | UpdateInvoiceError::ClientEmailValidation(_)
            | UpdateInvoiceError::InvalidStatus(_) => AppError::Validation(err.to_string()),
            UpdateInvoiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateInvoiceError::MissingTenant => AppError::Forbidden(err.to_string()),
            UpdateInvoiceError::Database(e) => AppError::Database(e),
        }
    }
}

impl UpdateInvoiceCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), UpdateInvoiceError> {
        if self.client_name.is_none()
            && self.client_email.is_none()
            && self.issue_date.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
        {
            return Err(UpdateInvoiceError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.client_name {
            validate_name(name, "client_name", 255)?;
        }
        if let Some(ref email) = self.client_email {
            validate_email(email, "client_email")?;
        }
        if let Some(ref status) = self.status {
            status
                .parse::<InvoiceStatus>()
                .map_err(|_| UpdateInvoiceError::InvalidStatus(status.clone()))?;
        }
        Ok(())
    }
}

/// Handler function for updating invoices
#[tracing::instrument(skip(pool, ctx, command))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    invoice_id: Uuid,
    command: UpdateInvoiceCommand,
) -> Result<Invoice, UpdateInvoiceError> {
    command.validate()?;

    let organization_id = ctx
        .organization_id()
        .ok_or(UpdateInvoiceError::MissingTenant)?;

    let existing = fetch_scoped(&pool, organization_id, invoice_id)
        .await?
        .ok_or(UpdateInvoiceError::NotFound(invoice_id))?;

    let client_name = command
        .client_name
        .unwrap_or_else(|| existing.client_name.clone());
    let client_email = command
        .client_email
        .unwrap_or_else(|| existing.client_email.clone());
    let issue_date = command.issue_date.unwrap_or(existing.issue_date);
    let due_date = command.due_date.unwrap_or(existing.due_date);
    let status = command.status.unwrap_or_else(|| existing.status.clone());

    let invoice = audited_update(&pool, &ctx, &existing, async {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET client_name = $3, client_email = $4, issue_date = $5, due_date = $6,
                status = $7, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, number, client_name, client_email,
                      issue_date, due_date, status, total_amount, created_at, updated_at
            "#,
        )
        .bind(invoice_id)
        .bind(organization_id)
        .bind(&client_name)
        .bind(&client_email)
        .bind(issue_date)
        .bind(due_date)
        .bind(&status)
        .fetch_one(&pool)
        .await
    })
    .await?;

    tracing::info!(invoice_id = %invoice.id, "Invoice updated");

    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_rejected() {
        assert!(matches!(
            UpdateInvoiceCommand::default().validate(),
            Err(UpdateInvoiceError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_status_validated_when_present() {
        let cmd = UpdateInvoiceCommand {
            status: Some("void".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cmd.validate(),
            Err(UpdateInvoiceError::InvalidStatus(_))
        ));

        let cmd = UpdateInvoiceCommand {
            status: Some("paid".to_string()),
            ..Default::default()
        };
        assert!(cmd.validate().is_ok());
    }
}
