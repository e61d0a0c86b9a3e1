pub mod commands;
pub mod queries;
pub mod routes;
pub mod totals;
pub mod types;

pub use routes::billing_routes;
pub use types::{Invoice, InvoiceItem};
