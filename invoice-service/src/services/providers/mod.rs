//! Outbound integrations: email delivery and the product catalog bridge.

pub mod catalog;
pub mod email;

pub use catalog::{AbsentCatalog, HttpCatalog};
pub use email::{MockMailer, SmtpMailer};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderResponse {
    pub provider_id: String,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

/// A product offered by the external shop catalog, normalized for
/// line-item prefill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub currency: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<ProviderResponse, ProviderError>;
    async fn health_check(&self) -> Result<bool, ProviderError>;
    fn is_enabled(&self) -> bool;
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// List published products, optionally filtered by a search term.
    async fn search(&self, term: Option<&str>) -> Result<Vec<CatalogProduct>, ProviderError>;
    fn is_available(&self) -> bool;
}
