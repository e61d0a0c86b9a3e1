//! Invoice total maintenance
//!
//! `total_amount` is a derived value: at rest it must equal the sum of
//! `quantity x unit_price` over the invoice's current line items. Every
//! line-item mutation runs inside one transaction that first locks the
//! invoice row, applies the write, and then calls [`recompute_invoice_total`]
//! before committing. The lock serializes concurrent writers on the same
//! invoice so each recompute sums a consistent item set; without it two
//! interleaved mutations could both sum a stale set and lose an update.
//!
//! The recompute always re-sums the full item set in exact decimal
//! arithmetic. A failed recompute must abort the surrounding transaction -
//! callers propagate the error before commit.

use bigdecimal::BigDecimal;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

/// Lock the invoice row for the remainder of the transaction
///
/// Returns false when the invoice does not exist.
pub async fn lock_invoice(
    tx: &mut Transaction<'_, Postgres>,
    invoice_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM invoices WHERE id = $1 FOR UPDATE")
        .bind(invoice_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(locked.is_some())
}

/// Recompute and write back the invoice total from its current line items
///
/// Must run inside the same transaction as the item mutation that
/// triggered it.
pub async fn recompute_invoice_total(
    tx: &mut Transaction<'_, Postgres>,
    invoice_id: Uuid,
) -> Result<BigDecimal, sqlx::Error> {
    let total: BigDecimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(quantity * unit_price), 0::NUMERIC)
        FROM invoice_items
        WHERE invoice_id = $1
        "#,
    )
    .bind(invoice_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("UPDATE invoices SET total_amount = $2, updated_at = NOW() WHERE id = $1")
        .bind(invoice_id)
        .bind(&total)
        .execute(&mut **tx)
        .await?;

    debug!(invoice_id = %invoice_id, total = %total, "Invoice total recomputed");

    Ok(total)
}
