//! Invoice endpoints: compose, list, fetch, render, email, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

use crate::models::{Invoice, InvoiceStatus, InvoiceSummary, LineItem, NewInvoice, SellerProfile};
use crate::services::calculator::compute_totals;
use crate::services::metrics::{
    DOCUMENTS_RENDERED_TOTAL, EMAIL_SENDS_TOTAL, ERRORS_TOTAL, INVOICES_TOTAL,
    INVOICE_AMOUNT_TOTAL,
};
use crate::services::numbering;
use crate::services::providers::{EmailMessage, ProviderError};
use crate::services::storage::sanitize_file_name;
use crate::startup::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_number: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[validate(length(min = 1, message = "Invoice date is required"))]
    pub invoice_date: String,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub title: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub invoice_date: String,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: String,
    pub status_label: String,
    pub has_file: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Invoice> for InvoiceResponse {
    type Error = AppError;

    // Totals are recomputed from items on the way out; a stored invoice
    // was accepted by the same arithmetic, so overflow here means a
    // corrupted row.
    fn try_from(invoice: Invoice) -> Result<Self, AppError> {
        let totals = compute_totals(&invoice.items, invoice.tax_rate).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Totals of invoice {} overflow",
                invoice.id
            ))
        })?;
        let status = InvoiceStatus::from_string(&invoice.status);
        Ok(Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            customer_name: invoice.customer_name,
            customer_phone: invoice.customer_phone,
            customer_address: invoice.customer_address,
            invoice_date: invoice.invoice_date,
            items: invoice.items,
            subtotal: totals.subtotal,
            discount_amount: totals.discount_total,
            tax_rate: invoice.tax_rate,
            tax_amount: totals.tax_amount,
            total_amount: invoice.total_amount,
            currency: invoice.currency,
            status: status.as_str().to_string(),
            status_label: status.label().to_string(),
            has_file: !invoice.file_path.is_empty(),
            created_at: invoice.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceListItem {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub invoice_date: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: String,
    pub status_label: String,
    pub has_file: bool,
}

impl From<InvoiceSummary> for InvoiceListItem {
    fn from(summary: InvoiceSummary) -> Self {
        let status = InvoiceStatus::from_string(&summary.status);
        Self {
            id: summary.id,
            invoice_number: summary.invoice_number,
            customer_name: summary.customer_name,
            invoice_date: summary.invoice_date,
            total_amount: summary.total_amount,
            currency: summary.currency,
            status: status.as_str().to_string(),
            status_label: status.label().to_string(),
            has_file: !summary.file_path.is_empty(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextInvoiceNumber {
    pub invoice_number: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub print: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailInvoiceRequest {
    #[validate(email(message = "A valid recipient email is required"))]
    pub recipient: String,
}

/// Rows without a title are dropped; negative amounts are rejected.
/// Rows that survive get the configured default unit when none is given.
fn build_line_items(
    inputs: &[LineItemInput],
    default_unit: &str,
) -> Result<Vec<LineItem>, AppError> {
    let mut items = Vec::with_capacity(inputs.len());
    for input in inputs {
        let title = input.title.trim();
        if title.is_empty() {
            continue;
        }
        if input.quantity < Decimal::ZERO
            || input.price < Decimal::ZERO
            || input.discount < Decimal::ZERO
        {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Line item amounts must not be negative"
            )));
        }
        let unit = input
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .unwrap_or(default_unit);
        let item = LineItem::new(
            title.to_string(),
            input.quantity,
            unit.to_string(),
            input.price,
            input.discount,
        )
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Line item amounts are too large"))
        })?;
        items.push(item);
    }
    if items.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "At least one line item with a title is required"
        )));
    }
    Ok(items)
}

/// Render the invoice document and record it on disk and in the row.
/// The stored copy triggers the print dialog when opened.
async fn store_document(
    state: &AppState,
    invoice: &Invoice,
    profile: &SellerProfile,
) -> anyhow::Result<String> {
    let html = state.renderer.render(invoice, profile, true)?;
    let file_name = format!(
        "invoice-{}-{}.html",
        sanitize_file_name(&invoice.invoice_number),
        invoice.id
    );
    state.documents.store(&file_name, &html).await?;
    let updated = state.db.update_file_path(invoice.id, &file_name).await?;
    if updated == 0 {
        anyhow::bail!("invoice row vanished before its file path was recorded");
    }
    DOCUMENTS_RENDERED_TOTAL.with_label_values(&["file"]).inc();
    Ok(file_name)
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    if request.tax_rate < Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Tax rate must not be negative"
        )));
    }

    let items = build_line_items(&request.items, &state.config.defaults.unit)?;
    let profile = state.db.load_seller_profile().await?;
    let totals = compute_totals(&items, request.tax_rate).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Invoice totals are too large"))
    })?;

    let currency = request
        .currency
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| profile.default_currency.clone());
    let status = InvoiceStatus::from_string(request.status.as_deref().unwrap_or("unpaid"));

    let new_invoice = NewInvoice {
        invoice_number: request.invoice_number.trim().to_string(),
        customer_name: request.customer_name.trim().to_string(),
        customer_phone: request.customer_phone.trim().to_string(),
        customer_address: request.customer_address.trim().to_string(),
        invoice_date: request.invoice_date.trim().to_string(),
        items,
        total_amount: totals.total,
        discount_amount: totals.discount_total,
        tax_rate: request.tax_rate,
        currency,
        status: status.as_str().to_string(),
    };

    let created = state.db.create_invoice(&new_invoice).await?;
    INVOICES_TOTAL.with_label_values(&[&created.status]).inc();
    INVOICE_AMOUNT_TOTAL
        .with_label_values(&[&created.currency])
        .inc_by(created.total_amount.to_f64().unwrap_or(0.0).max(0.0));

    let file_name = match store_document(&state, &created, &profile).await {
        Ok(file_name) => file_name,
        Err(e) => {
            ERRORS_TOTAL.with_label_values(&["document_store"]).inc();
            tracing::warn!(
                invoice_id = created.id,
                error = %e,
                "Invoice saved but its document could not be stored"
            );
            return Err(AppError::RenderPersistError(created.id, e));
        }
    };

    tracing::info!(
        invoice_id = created.id,
        invoice_number = %created.invoice_number,
        "Invoice created"
    );

    let invoice = Invoice {
        file_path: file_name,
        ..created
    };
    Ok((StatusCode::CREATED, Json(InvoiceResponse::try_from(invoice)?)))
}

pub async fn list_invoices(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let invoices = state.db.list_invoices().await?;
    let response: Vec<InvoiceListItem> =
        invoices.into_iter().map(InvoiceListItem::from).collect();
    Ok(Json(response))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .db
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;
    Ok(Json(InvoiceResponse::try_from(invoice)?))
}

pub async fn next_invoice_number(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invoice_number =
        numbering::suggest_invoice_number(&state.db, &state.config.defaults.number_prefix)
            .await?;
    Ok(Json(NextInvoiceNumber { invoice_number }))
}

/// Serve the invoice as a standalone HTML document. With `?print=true`
/// the page triggers the browser print dialog on load.
pub async fn get_invoice_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .db
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;
    let profile = state.db.load_seller_profile().await?;
    let html = state.renderer.render(&invoice, &profile, query.print)?;
    DOCUMENTS_RENDERED_TOTAL.with_label_values(&["view"]).inc();
    Ok(Html(html))
}

pub async fn email_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EmailInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let invoice = state
        .db
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;
    let profile = state.db.load_seller_profile().await?;
    let html = state.renderer.render(&invoice, &profile, false)?;

    let message = EmailMessage {
        to: request.recipient.clone(),
        subject: format!(
            "فاکتور شماره {} از طرف {}",
            invoice.invoice_number, profile.company_name
        ),
        body_html: html,
    };

    match state.mailer.send(&message).await {
        Ok(response) => {
            EMAIL_SENDS_TOTAL.with_label_values(&["sent"]).inc();
            DOCUMENTS_RENDERED_TOTAL.with_label_values(&["email"]).inc();
            tracing::info!(invoice_id = id, recipient = %request.recipient, "Invoice emailed");
            Ok(Json(response))
        }
        Err(ProviderError::InvalidRecipient(detail)) => {
            EMAIL_SENDS_TOTAL.with_label_values(&["failed"]).inc();
            Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid recipient: {}",
                detail
            )))
        }
        Err(e) => {
            EMAIL_SENDS_TOTAL.with_label_values(&["failed"]).inc();
            ERRORS_TOTAL.with_label_values(&["email"]).inc();
            Err(AppError::EmailError(e.to_string()))
        }
    }
}

/// Remove the stored document (best effort) and then the row itself.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .db
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;

    if !invoice.file_path.is_empty() {
        if let Err(e) = state.documents.remove(&invoice.file_path).await {
            tracing::warn!(invoice_id = id, error = %e, "Failed to remove invoice document");
        }
    }

    // The row can disappear between the fetch above and this delete.
    if !state.db.delete_invoice(id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Invoice {} not found",
            id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, quantity: i64, price: i64, discount: i64) -> LineItemInput {
        LineItemInput {
            title: title.to_string(),
            quantity: Decimal::from(quantity),
            unit: None,
            price: Decimal::from(price),
            discount: Decimal::from(discount),
        }
    }

    #[test]
    fn test_untitled_rows_are_dropped() {
        let inputs = vec![input("", 1, 100, 0), input("سرویس", 2, 50, 0)];
        let items = build_line_items(&inputs, "عدد").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "سرویس");
    }

    #[test]
    fn test_all_rows_untitled_is_rejected() {
        let inputs = vec![input("", 1, 100, 0), input("   ", 1, 100, 0)];
        assert!(build_line_items(&inputs, "عدد").is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let inputs = vec![input("سرویس", 1, -100, 0)];
        assert!(build_line_items(&inputs, "عدد").is_err());
    }

    #[test]
    fn test_missing_unit_gets_default() {
        let inputs = vec![input("سرویس", 1, 100, 0)];
        let items = build_line_items(&inputs, "عدد").unwrap();
        assert_eq!(items[0].unit, "عدد");
    }

    #[test]
    fn test_overflowing_line_item_is_rejected() {
        let mut row = input("سرویس", 1, 2, 0);
        row.quantity = Decimal::MAX;
        assert!(build_line_items(&[row], "عدد").is_err());
    }

    #[test]
    fn test_blank_unit_gets_default() {
        let mut row = input("سرویس", 1, 100, 0);
        row.unit = Some("  ".to_string());
        let items = build_line_items(&[row], "عدد").unwrap();
        assert_eq!(items[0].unit, "عدد");
    }
}
