//! Seller profile settings.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use service_core::error::AppError;

use crate::models::{SellerProfile, CURRENCIES};
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub profile: SellerProfile,
    pub currencies: Vec<&'static str>,
}

impl SettingsResponse {
    fn new(profile: SellerProfile) -> Self {
        Self {
            profile,
            currencies: CURRENCIES.to_vec(),
        }
    }
}

pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let profile = state.db.load_seller_profile().await?;
    Ok(Json(SettingsResponse::new(profile)))
}

/// Partial update: known keys overwrite the stored profile, unknown keys
/// are ignored. Returns the updated profile.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(updates): Json<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let mut profile = state.db.load_seller_profile().await?;
    profile.apply(&updates);
    state.db.save_seller_profile(&profile).await?;

    tracing::info!(updated_keys = updates.len(), "Seller profile updated");
    Ok(Json(SettingsResponse::new(profile)))
}
