use aura_core::currency::{self, Currency};
use aura_core::identity::Identity;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrencySelection {
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub amount: f64,
    pub from: String,
    /// Defaults to the user's selected currency
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub amount: f64,
    pub currency: String,
    pub formatted: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/currencies", get(list_currencies))
        .route("/currency", get(selected_currency).put(select_currency))
        .route("/currency/convert", post(convert))
}

/// GET /v1/currencies
async fn list_currencies() -> Json<&'static [Currency]> {
    Json(currency::currencies())
}

/// GET /v1/currency
async fn selected_currency(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<CurrencySelection> {
    Json(CurrencySelection {
        currency: state.currency_for(&identity.user_id).await,
    })
}

/// PUT /v1/currency
async fn select_currency(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CurrencySelection>,
) -> Result<Json<CurrencySelection>, AppError> {
    let code = req.currency.trim().to_ascii_uppercase();
    if !currency::is_supported(&code) {
        return Err(AppError::Validation(format!("Unsupported currency: {}", req.currency)));
    }

    state
        .preferences
        .set(&identity.user_id, &code)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save currency preference: {}", e)))?;
    tracing::info!(user_id = %identity.user_id, currency = %code, "Currency selected");

    Ok(Json(CurrencySelection { currency: code }))
}

/// POST /v1/currency/convert
async fn convert(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    if !req.amount.is_finite() {
        return Err(AppError::Validation("Amount must be a finite number".to_string()));
    }
    let to = match req.to {
        Some(code) => code.to_ascii_uppercase(),
        None => state.currency_for(&identity.user_id).await,
    };
    let amount = currency::convert(req.amount, &req.from.to_ascii_uppercase(), &to);

    Ok(Json(ConvertResponse {
        formatted: currency::format(amount, &to),
        amount,
        currency: to,
    }))
}
