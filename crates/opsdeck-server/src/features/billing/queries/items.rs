//! Invoice item lookups

use sqlx::PgPool;
use uuid::Uuid;

use super::super::types::InvoiceItem;

/// Fetch one item scoped through its invoice's organization
///
/// The join both enforces tenant scoping and materializes the item's
/// one-hop tenant reference for audit resolution.
pub async fn fetch_item_scoped(
    pool: &PgPool,
    organization_id: Uuid,
    item_id: Uuid,
) -> Result<Option<InvoiceItem>, sqlx::Error> {
    sqlx::query_as::<_, InvoiceItem>(
        r#"
        SELECT ii.id, ii.invoice_id, ii.description, ii.quantity, ii.unit_price,
               ii.created_at, ii.updated_at,
               i.organization_id AS invoice_organization_id
        FROM invoice_items ii
        JOIN invoices i ON i.id = ii.invoice_id
        WHERE ii.id = $1 AND i.organization_id = $2
        "#,
    )
    .bind(item_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}
