//! Create invoice command
//!
//! Invoice numbers are a zero-padded sequence per organization, derived
//! from the most recently created invoice. The per-organization unique
//! constraint backstops the rare race between two concurrent creates, which
//! then surfaces as a conflict.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use opsdeck_common::types::InvoiceStatus;

use crate::audit::audited_create;
use crate::error::AppError;
use crate::features::shared::validation::{
    validate_email, validate_name, EmailValidationError, NameValidationError,
};
use crate::tenancy::RequestContext;

use super::super::types::Invoice;

/// Command to create a new invoice
///
/// The number and total are server-assigned; new invoices start at 0.00
/// until line items arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceCommand {
    pub client_name: String,
    pub client_email: String,
    pub issue_date: chrono::NaiveDate,
    pub due_date: chrono::NaiveDate,

    /// Defaults to `draft`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Errors that can occur when creating an invoice
#[derive(Debug, thiserror::Error)]
pub enum CreateInvoiceError {
    #[error("Client name validation failed: {0}")]
    ClientNameValidation(#[from] NameValidationError),

    #[error("Client email validation failed: {0}")]
    ClientEmailValidation(#[from] EmailValidationError),

    #[error("'{0}' is not a valid invoice status")]
    InvalidStatus(String),

    #[error("Due date cannot be before the issue date")]
    DueBeforeIssue,

    #[error("Invoice number was taken by a concurrent create; retry")]
    NumberConflict,

    #[error("No organization resolved for this request")]
    MissingTenant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateInvoiceError> for AppError {
    fn from(err: CreateInvoiceError) -> Self {
        match err {
            CreateInvoiceError::ClientNameValidation(_)
            | CreateInvoiceError::ClientEmailValidation(_)
            | CreateInvoiceError::InvalidStatus(_)
            | CreateInvoiceError::DueBeforeIssue => AppError::Validation(err.to_string()),
            CreateInvoiceError::NumberConflict => AppError::Conflict(err.to_string()),
            CreateInvoiceError::MissingTenant => AppError::Forbidden(err.to_string()),
            CreateInvoiceError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateInvoiceCommand {
    /// Validates the command, returning the parsed status
    pub fn validate(&self) -> Result<InvoiceStatus, CreateInvoiceError> {
        validate_name(&self.client_name, "client_name", 255)?;
        validate_email(&self.client_email, "client_email")?;
        if self.due_date < self.issue_date {
            return Err(CreateInvoiceError::DueBeforeIssue);
        }
        match &self.status {
            Some(status) => status
                .parse()
                .map_err(|_| CreateInvoiceError::InvalidStatus(status.clone())),
            None => Ok(InvoiceStatus::default()),
        }
    }
}

/// Next invoice number for an organization: latest numeric value plus one,
/// zero-padded to five digits. Non-numeric legacy numbers restart the
/// sequence at 00001.
fn next_number(last: Option<String>) -> String {
    let last_int = last.and_then(|n| n.parse::<i64>().ok()).unwrap_or(0);
    format!("{:05}", last_int + 1)
}

/// Handler function for creating invoices
#[tracing::instrument(skip(pool, ctx, command), fields(client = %command.client_name))]
pub async fn handle(
    pool: PgPool,
    ctx: RequestContext,
    command: CreateInvoiceCommand,
) -> Result<Invoice, CreateInvoiceError> {
    let status = command.validate()?;

    let organization_id = ctx
        .organization_id()
        .ok_or(CreateInvoiceError::MissingTenant)?;

    let last: Option<String> = sqlx::query_scalar(
        r#"
        SELECT number FROM invoices
        WHERE organization_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(organization_id)
    .fetch_optional(&pool)
    .await?;
    let number = next_number(last);

    let invoice = audited_create(&pool, &ctx, async {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (organization_id, number, client_name, client_email,
                                  issue_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organization_id, number, client_name, client_email,
                      issue_date, due_date, status, total_amount, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&number)
        .bind(&command.client_name)
        .bind(&command.client_email)
        .bind(command.issue_date)
        .bind(command.due_date)
        .bind(status.as_str())
        .fetch_one(&pool)
        .await
    })
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreateInvoiceError::NumberConflict;
            }
        }
        CreateInvoiceError::Database(e)
    })?;

    tracing::info!(invoice_id = %invoice.id, number = %invoice.number, "Invoice created");

    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn command() -> CreateInvoiceCommand {
        CreateInvoiceCommand {
            client_name: "Globex".to_string(),
            client_email: "billing@globex.com".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            status: None,
        }
    }

    #[test]
    fn test_validation_defaults_to_draft() {
        assert_eq!(command().validate().unwrap(), InvoiceStatus::Draft);
    }

    #[test]
    fn test_due_before_issue_rejected() {
        let cmd = CreateInvoiceCommand {
            due_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            ..command()
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateInvoiceError::DueBeforeIssue)
        ));
    }

    #[test]
    fn test_bad_email_rejected() {
        let cmd = CreateInvoiceCommand {
            client_email: "not-an-email".to_string(),
            ..command()
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateInvoiceError::ClientEmailValidation(_))
        ));
    }

    #[test]
    fn test_number_sequence() {
        assert_eq!(next_number(None), "00001");
        assert_eq!(next_number(Some("00041".to_string())), "00042");
        // non-numeric legacy numbers restart the sequence
        assert_eq!(next_number(Some("INV-OLD".to_string())), "00001");
    }
}
