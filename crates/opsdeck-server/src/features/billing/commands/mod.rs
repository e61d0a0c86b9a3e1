pub mod create_invoice;
pub mod create_item;
pub mod delete_invoice;
pub mod delete_item;
pub mod update_invoice;
pub mod update_item;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceError};
pub use create_item::{CreateItemCommand, CreateItemError};
pub use delete_invoice::{DeleteInvoiceError, DeleteInvoiceResponse};
pub use delete_item::{DeleteItemError, DeleteItemResponse};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceError};
pub use update_item::{UpdateItemCommand, UpdateItemError};
