use aura_core::identity::Identity;
use aura_shared::pii::Masked;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: Option<Masked<String>>,
    pub credits: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/session", post(open_session))
}

/// Sign-in callback. The identity middleware has already initialized the
/// user's credits; this reports the resulting account state.
async fn open_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<SessionResponse>, AppError> {
    let credits = state.orchestrator.balance_of(&identity.user_id).await;
    tracing::info!(user_id = %identity.user_id, email = ?identity.email, "Session opened");

    Ok(Json(SessionResponse {
        user_id: identity.user_id,
        email: identity.email,
        credits,
    }))
}
