//! Domain models for invoice-service.

mod invoice;
mod line_item;
mod seller_profile;

pub use invoice::{Invoice, InvoiceStatus, InvoiceSummary, NewInvoice};
pub use line_item::LineItem;
pub use seller_profile::{SellerProfile, CURRENCIES};
