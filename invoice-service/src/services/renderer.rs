//! Invoice document rendering.
//!
//! Produces a self-contained right-to-left HTML document from an invoice
//! and the seller profile. Totals are recomputed from the stored line
//! items on every render, so the document never trusts a stale
//! `total_amount` column.

use std::collections::HashMap;
use std::str::FromStr;

use minijinja::value::Value as TemplateValue;
use minijinja::Environment;
use rust_decimal::Decimal;
use service_core::error::AppError;

use crate::models::{Invoice, SellerProfile};
use crate::services::calculator::compute_totals;

/// Format an amount with a thousands separator and two decimal places,
/// e.g. `1234567.5` becomes `1,234,567.50`.
pub fn format_money(amount: Decimal) -> String {
    let formatted = format!("{:.2}", amount);
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = rest.split_once('.').unwrap_or((rest, "00"));
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Template filter: amounts arrive as decimal strings (or numbers) and
/// leave formatted. Unparseable input is passed through untouched.
fn money_filter(value: TemplateValue) -> String {
    let raw = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    match Decimal::from_str(&raw) {
        Ok(amount) => format_money(amount),
        Err(_) => raw,
    }
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.add_filter("money", money_filter);
        env.add_template("invoice.html", include_str!("../../templates/invoice.html"))
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!(
                    "Failed to load invoice template: {}",
                    e
                ))
            })?;
        Ok(Self { env })
    }

    /// Render the invoice document. With `print_on_load` the page calls
    /// `window.print()` as soon as it opens.
    pub fn render(
        &self,
        invoice: &Invoice,
        profile: &SellerProfile,
        print_on_load: bool,
    ) -> Result<String, AppError> {
        let totals = compute_totals(&invoice.items, invoice.tax_rate).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Totals of invoice {} overflow",
                invoice.id
            ))
        })?;

        let mut context: HashMap<&str, serde_json::Value> = HashMap::new();
        context.insert("invoice", encode("invoice", invoice)?);
        context.insert("items", encode("items", &invoice.items)?);
        context.insert("profile", encode("profile", profile)?);
        context.insert("totals", encode("totals", &totals)?);
        context.insert("print_on_load", serde_json::Value::Bool(print_on_load));

        let template = self.env.get_template("invoice.html").map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Invoice template missing: {}", e))
        })?;
        template.render(&context).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to render invoice document: {}",
                e
            ))
        })
    }
}

fn encode<T: serde::Serialize>(name: &str, value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!(
            "Failed to encode template context '{}': {}",
            name,
            e
        ))
    })
}
