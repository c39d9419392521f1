use aura_core::identity::Identity;
use aura_order::{BookingError, BookingOrchestrator, BookingRequest};
use aura_shared::Booking;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Id of a flight in the user's current search results
    pub flight_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
    pub credits_charged: u64,
    pub credits_remaining: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}

/// GET /v1/bookings
/// Active bookings of the caller, oldest first
async fn list_bookings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<Vec<Booking>> {
    Json(state.orchestrator.bookings_for(&identity.user_id).await)
}

/// POST /v1/bookings
async fn create_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let (flight, passenger_count) = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&identity.user_id)
            .ok_or_else(|| AppError::NotFound("No search results; search for flights first".to_string()))?;
        let flight = session
            .engine
            .find(&req.flight_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Flight {} not in current results", req.flight_id)))?;
        (flight, session.passenger_count())
    };

    let currency_code = state.currency_for(&identity.user_id).await;
    let credits_charged = BookingOrchestrator::price_in_credits(&flight, &currency_code)?;

    let result = state
        .orchestrator
        .book(BookingRequest {
            user_id: identity.user_id.clone(),
            flight,
            passenger_count,
            currency: currency_code,
        })
        .await;

    let outcome = match &result {
        Ok(_) => "confirmed",
        Err(BookingError::InsufficientCredits { .. }) => "insufficient_credits",
        Err(BookingError::InProgress) => "in_progress",
        Err(_) => "failed",
    };
    state.metrics.bookings.with_label_values(&[outcome]).inc();

    let booking = result?;
    let credits_remaining = state.orchestrator.balance_of(&identity.user_id).await;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse { booking, credits_charged, credits_remaining }),
    ))
}

/// POST /v1/bookings/{id}/cancel
/// Credits spent on the booking are not returned. Unknown or already
/// cancelled ids are a no-op answered with 204.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<String>,
) -> Result<Response, AppError> {
    let response = match state.orchestrator.cancel(&identity.user_id, &booking_id).await? {
        Some(cancelled) => Json(cancelled).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
