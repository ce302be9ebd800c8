//! Invoice model for invoice-service.

use crate::models::LineItem;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;

/// Settlement status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Partial,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Partial => "partial",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => InvoiceStatus::Paid,
            "partial" => InvoiceStatus::Partial,
            _ => InvoiceStatus::Unpaid,
        }
    }

    /// Human-facing label shown on the invoice list.
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "تسویه نشده",
            InvoiceStatus::Paid => "تسویه شده",
            InvoiceStatus::Partial => "تسویه جزئی",
        }
    }
}

/// A stored invoice record. The `items` sequence is the source of truth
/// for all monetary totals; `total_amount` and `discount_amount` are the
/// persisted results of the same computation and are never mutated
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub invoice_date: String,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub tax_rate: Decimal,
    pub currency: String,
    pub status: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

/// Summary row for the invoice list, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSummary {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub invoice_date: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: String,
    pub file_path: String,
}

/// Input for inserting a new invoice. Totals are computed by the caller
/// from `items` before insertion.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub invoice_date: String,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub tax_rate: Decimal,
    pub currency: String,
    pub status: String,
}

// SQLite has no decimal type, so money columns are TEXT and decoded by
// hand; rust_decimal only ships Postgres/MySQL codecs.
fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn items_column(row: &SqliteRow) -> Result<Vec<LineItem>, sqlx::Error> {
    let raw: String = row.try_get("items")?;
    serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: "items".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, SqliteRow> for Invoice {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            invoice_number: row.try_get("invoice_number")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_address: row.try_get("customer_address")?,
            invoice_date: row.try_get("invoice_date")?,
            items: items_column(row)?,
            total_amount: decimal_column(row, "total_amount")?,
            discount_amount: decimal_column(row, "discount_amount")?,
            tax_rate: decimal_column(row, "tax_rate")?,
            currency: row.try_get("currency")?,
            status: row.try_get("status")?,
            file_path: row.try_get("file_path")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for InvoiceSummary {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            invoice_number: row.try_get("invoice_number")?,
            customer_name: row.try_get("customer_name")?,
            invoice_date: row.try_get("invoice_date")?,
            total_amount: decimal_column(row, "total_amount")?,
            currency: row.try_get("currency")?,
            status: row.try_get("status")?,
            file_path: row.try_get("file_path")?,
        })
    }
}
