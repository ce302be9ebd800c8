//! Product catalog lookups for line-item prefill.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use service_core::error::AppError;

use crate::services::metrics::ERRORS_TOTAL;
use crate::services::providers::ProviderError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
}

pub async fn search_catalog_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let term = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());

    match state.catalog.search(term).await {
        Ok(products) => Ok(Json(products)),
        Err(ProviderError::NotEnabled(_)) => Err(AppError::IntegrationAbsent(
            "Product catalog is not configured".to_string(),
        )),
        Err(e) => {
            ERRORS_TOTAL.with_label_values(&["catalog"]).inc();
            Err(AppError::BadGateway(format!(
                "Catalog lookup failed: {}",
                e
            )))
        }
    }
}
