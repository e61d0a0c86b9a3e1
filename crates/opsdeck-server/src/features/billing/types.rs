//! Invoice and line-item entities and their audit descriptors

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::audit::{Auditable, EntityDescriptor, FieldDescriptor, TenantRef};

/// An invoice issued by an organization
///
/// `total_amount` is derived: it always equals the sum of the line items'
/// `quantity x unit_price` at rest, recomputed inside the same transaction
/// as every item mutation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub number: String,
    pub client_name: String,
    pub client_email: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complete persisted schema of an invoice, in column order
static INVOICE_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_type: "invoice",
    fields: &[
        FieldDescriptor::scalar("id"),
        FieldDescriptor::relation("organization_id"),
        FieldDescriptor::scalar("number"),
        FieldDescriptor::scalar("client_name"),
        FieldDescriptor::scalar("client_email"),
        FieldDescriptor::scalar("issue_date"),
        FieldDescriptor::scalar("due_date"),
        FieldDescriptor::scalar("status"),
        FieldDescriptor::scalar("total_amount"),
        FieldDescriptor::scalar("created_at"),
        FieldDescriptor::scalar("updated_at"),
    ],
};

impl Auditable for Invoice {
    fn descriptor() -> &'static EntityDescriptor {
        &INVOICE_DESCRIPTOR
    }

    fn entity_id(&self) -> String {
        self.id.to_string()
    }

    fn tenant_refs(&self) -> Vec<TenantRef> {
        vec![TenantRef::direct(Some(self.organization_id))]
    }
}

/// A line item of an invoice
///
/// Items have no tenant field; ownership is resolved one hop away through
/// the invoice. `invoice_organization_id` materializes that hop from a join
/// and is not part of the item's persisted schema.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub invoice_organization_id: Option<Uuid>,
}

impl InvoiceItem {
    /// Exact line total: `quantity x unit_price`
    pub fn line_total(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price
    }
}

/// Complete persisted schema of an invoice item, in column order
static INVOICE_ITEM_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_type: "invoice_item",
    fields: &[
        FieldDescriptor::scalar("id"),
        FieldDescriptor::relation("invoice_id"),
        FieldDescriptor::scalar("description"),
        FieldDescriptor::scalar("quantity"),
        FieldDescriptor::scalar("unit_price"),
        FieldDescriptor::scalar("created_at"),
        FieldDescriptor::scalar("updated_at"),
    ],
};

impl Auditable for InvoiceItem {
    fn descriptor() -> &'static EntityDescriptor {
        &INVOICE_ITEM_DESCRIPTOR
    }

    fn entity_id(&self) -> String {
        self.id.to_string()
    }

    fn tenant_refs(&self) -> Vec<TenantRef> {
        vec![TenantRef::through("invoice", self.invoice_organization_id)]
    }
}
