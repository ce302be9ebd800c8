pub mod catalog;
pub mod health;
pub mod invoices;
pub mod settings;

pub use catalog::search_catalog_products;
pub use health::{health_check, metrics};
pub use invoices::{
    create_invoice, delete_invoice, email_invoice, get_invoice, get_invoice_document,
    list_invoices, next_invoice_number,
};
pub use settings::{get_settings, update_settings};
