//! Product catalog bridge.
//!
//! Talks to the shop's catalog HTTP API when one is configured. The
//! service works fully without it; the bridge only feeds line-item
//! prefill in clients.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{CatalogProduct, CatalogProvider, ProviderError};

const CATALOG_PAGE_SIZE: usize = 50;

/// Translate shop currency codes to the display names used on invoices.
/// Unknown codes pass through unchanged.
pub fn map_currency_code(code: &str) -> String {
    match code {
        "IRR" => "ریال",
        "IRT" => "تومان",
        "USD" => "دلار",
        "EUR" => "یورو",
        "GBP" => "پوند",
        other => return other.to_string(),
    }
    .to_string()
}

#[derive(Debug, Deserialize)]
struct RemoteProduct {
    id: i64,
    name: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    currency: String,
}

impl RemoteProduct {
    /// Products without a price (unpriced drafts) normalize to zero.
    fn normalize(self) -> CatalogProduct {
        let price = Decimal::from_str(&self.price).unwrap_or(Decimal::ZERO);
        CatalogProduct {
            id: self.id,
            title: self.name,
            price,
            currency: map_currency_code(&self.currency),
        }
    }
}

pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to build catalog client: {}", e))
            })?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    async fn search(&self, term: Option<&str>) -> Result<Vec<CatalogProduct>, ProviderError> {
        let url = format!("{}/products", self.base_url.trim_end_matches('/'));
        let mut request = self.client.get(&url).query(&[("per_page", CATALOG_PAGE_SIZE)]);
        if let Some(term) = term {
            request = request.query(&[("search", term)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Connection(format!(
                "Catalog returned status {}",
                response.status()
            )));
        }

        let remote: Vec<RemoteProduct> = response.json().await.map_err(|e| {
            ProviderError::Connection(format!("Invalid catalog response: {}", e))
        })?;

        let mut products: Vec<CatalogProduct> =
            remote.into_iter().map(RemoteProduct::normalize).collect();
        products.truncate(CATALOG_PAGE_SIZE);

        tracing::info!(count = products.len(), "Catalog search completed");
        Ok(products)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Placeholder used when no catalog is configured.
pub struct AbsentCatalog;

#[async_trait]
impl CatalogProvider for AbsentCatalog {
    async fn search(&self, _term: Option<&str>) -> Result<Vec<CatalogProduct>, ProviderError> {
        Err(ProviderError::NotEnabled("catalog".to_string()))
    }

    fn is_available(&self) -> bool {
        false
    }
}
