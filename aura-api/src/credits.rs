use aura_core::identity::Identity;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub credits: u64,
}

#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    pub amount: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/credits", get(balance).post(top_up))
}

/// GET /v1/credits
async fn balance(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<CreditsResponse> {
    Json(CreditsResponse {
        credits: state.orchestrator.balance_of(&identity.user_id).await,
    })
}

/// POST /v1/credits
async fn top_up(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<TopUpRequest>,
) -> Result<Json<CreditsResponse>, AppError> {
    let amount = u64::try_from(req.amount)
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| AppError::Validation("Amount must be positive".to_string()))?;

    let credits = state.orchestrator.add_credits(&identity.user_id, amount).await?;
    Ok(Json(CreditsResponse { credits }))
}
