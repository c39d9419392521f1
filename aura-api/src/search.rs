use aura_core::identity::Identity;
use aura_shared::{Airport, FlightSearchParams};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::{error::AppError, flights::FlightsView, state::AppState};

const MIN_KEYWORD_LEN: usize = 2;

#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub keyword: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights/search", post(search_flights))
        .route("/airports", get(suggest_airports))
}

/// POST /v1/flights/search
///
/// Replaces the user's result set; the current filters stay in effect.
/// On failure the previous results are kept.
async fn search_flights(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(params): Json<FlightSearchParams>,
) -> Result<Json<FlightsView>, AppError> {
    params.validate().map_err(AppError::Validation)?;

    tracing::info!(
        user_id = %identity.user_id,
        origin = %params.origin_location_code,
        destination = %params.destination_location_code,
        date = %params.departure_date,
        "Searching flights"
    );

    let flights = match state.search.search_flights(&params).await {
        Ok(flights) => {
            state.metrics.searches.with_label_values(&["ok"]).inc();
            flights
        }
        Err(e) => {
            state.metrics.searches.with_label_values(&["error"]).inc();
            tracing::warn!(user_id = %identity.user_id, "Flight search failed: {}", e);
            return Err(e.into());
        }
    };

    let currency_code = state.currency_for(&identity.user_id).await;
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(identity.user_id.clone()).or_default();
    session.engine.set_results(flights);
    session.params = Some(params);

    Ok(Json(FlightsView::new(&session.engine, &currency_code)))
}

/// GET /v1/airports?keyword=
async fn suggest_airports(
    State(state): State<AppState>,
    Query(query): Query<AirportQuery>,
) -> Json<Vec<Airport>> {
    let keyword = query.keyword.trim();
    if keyword.chars().count() < MIN_KEYWORD_LEN {
        return Json(Vec::new());
    }
    Json(state.search.airport_suggestions(keyword).await)
}
