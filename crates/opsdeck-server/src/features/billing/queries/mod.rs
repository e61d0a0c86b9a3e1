pub mod get_invoice;
pub mod items;
pub mod list_invoices;

pub use get_invoice::InvoiceDetail;
pub use list_invoices::ListInvoicesQuery;
