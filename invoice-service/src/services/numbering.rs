//! Sequential display-number suggestion for new invoices.

use chrono::{Datelike, Utc};
use service_core::error::AppError;

use crate::services::database::Database;

/// Format a display number as `{prefix}-{year}-{sequence}` with the
/// sequence zero-padded to four digits.
pub fn format_invoice_number(prefix: &str, year: i32, sequence: i64) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}

/// Suggest the next display number: one past the highest stored row id,
/// under the current year.
///
/// The suggestion is advisory. Nothing is reserved, so two clients asking
/// at the same time can receive the same number; the stored column accepts
/// whatever the client finally submits.
pub async fn suggest_invoice_number(db: &Database, prefix: &str) -> Result<String, AppError> {
    let next = db.max_invoice_id().await? + 1;
    Ok(format_invoice_number(prefix, Utc::now().year(), next))
}
