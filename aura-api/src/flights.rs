use aura_catalog::{flight_utils, FlightFilterEngine};
use aura_core::currency;
use aura_core::identity::Identity;
use aura_order::BookingOrchestrator;
use aura_shared::{FilterUpdate, Flight, FlightFilters, PriceDataPoint, PriceRange};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Response Types
// ============================================================================

/// A flight with the display facts the client renders next to it.
#[derive(Debug, Serialize)]
pub struct FlightSummary {
    pub flight: Flight,
    pub airline: String,
    pub stops: u32,
    pub stops_label: String,
    pub duration_minutes: u32,
    /// Price converted to the user's currency
    pub display_price: String,
    pub price_in_credits: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AirlineOption {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct FlightsView {
    pub flights: Vec<FlightSummary>,
    pub total_results: usize,
    pub filters: FlightFilters,
    pub price_graph: Vec<PriceDataPoint>,
    pub airlines: Vec<AirlineOption>,
    pub price_range: PriceRange,
    pub currency: String,
}

impl FlightSummary {
    pub fn new(flight: &Flight, currency_code: &str) -> Self {
        let stops = flight_utils::total_stops(flight);
        let airline = flight
            .validating_airline_codes
            .first()
            .map(|code| flight_utils::airline_name(code).to_string())
            .unwrap_or_default();
        let display_price = match flight.price_amount() {
            Some(amount) => currency::format(
                currency::convert(amount, &flight.price.currency, currency_code),
                currency_code,
            ),
            None => flight.price.total.clone(),
        };

        Self {
            flight: flight.clone(),
            airline,
            stops,
            stops_label: flight_utils::stops_label(stops),
            duration_minutes: flight_utils::outbound_minutes(flight),
            display_price,
            price_in_credits: BookingOrchestrator::price_in_credits(flight, currency_code).ok(),
        }
    }
}

impl FlightsView {
    /// Filter options (airlines, price range) come from the full result set;
    /// the list and the price graph from the filtered view.
    pub fn new(engine: &FlightFilterEngine, currency_code: &str) -> Self {
        let filtered = engine.filtered();
        Self {
            flights: filtered.iter().map(|f| FlightSummary::new(f, currency_code)).collect(),
            total_results: engine.results().len(),
            filters: engine.filters().clone(),
            price_graph: flight_utils::price_histogram(filtered),
            airlines: flight_utils::unique_airlines(engine.results())
                .into_iter()
                .map(|code| AirlineOption {
                    name: flight_utils::airline_name(&code).to_string(),
                    code,
                })
                .collect(),
            price_range: flight_utils::price_range(engine.results()),
            currency: currency_code.to_string(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(current_view).delete(reset_session))
        .route("/flights/filters", patch(update_filters))
        .route("/flights/price-graph", get(price_graph))
}

/// GET /v1/flights
async fn current_view(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<FlightsView> {
    let currency_code = state.currency_for(&identity.user_id).await;
    let sessions = state.sessions.read().await;
    let view = match sessions.get(&identity.user_id) {
        Some(session) => FlightsView::new(&session.engine, &currency_code),
        None => FlightsView::new(&FlightFilterEngine::new(), &currency_code),
    };
    Json(view)
}

/// PATCH /v1/flights/filters
async fn update_filters(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(update): Json<FilterUpdate>,
) -> Result<Json<FlightsView>, AppError> {
    validate_update(&update)?;
    let currency_code = state.currency_for(&identity.user_id).await;

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(identity.user_id.clone()).or_default();
    session.engine.set_filters(update);
    tracing::debug!(
        user_id = %identity.user_id,
        visible = session.engine.filtered().len(),
        "Filters updated"
    );

    Ok(Json(FlightsView::new(&session.engine, &currency_code)))
}

/// DELETE /v1/flights
async fn reset_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> StatusCode {
    state.sessions.write().await.remove(&identity.user_id);
    StatusCode::NO_CONTENT
}

/// GET /v1/flights/price-graph
async fn price_graph(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<Vec<PriceDataPoint>> {
    let sessions = state.sessions.read().await;
    let graph = sessions
        .get(&identity.user_id)
        .map(|s| flight_utils::price_histogram(s.engine.filtered()))
        .unwrap_or_default();
    Json(graph)
}

fn validate_update(update: &FilterUpdate) -> Result<(), AppError> {
    let bounds = [update.min_price.flatten(), update.max_price.flatten()];
    if bounds.iter().flatten().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(AppError::Validation("Price bounds must be non-negative numbers".to_string()));
    }
    Ok(())
}
