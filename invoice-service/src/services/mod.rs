pub mod calculator;
pub mod database;
pub mod metrics;
pub mod numbering;
pub mod providers;
pub mod renderer;
pub mod storage;

pub use calculator::{compute_totals, InvoiceTotals};
pub use database::Database;
pub use renderer::Renderer;
pub use storage::{sanitize_file_name, DocumentStore, LocalDocumentStore};
