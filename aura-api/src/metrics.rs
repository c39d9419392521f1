use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::state::AppState;

/// Request counters, labelled by outcome.
pub struct Metrics {
    registry: Registry,
    pub searches: IntCounterVec,
    pub bookings: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let searches = IntCounterVec::new(
            Opts::new("aura_searches_total", "Flight searches by outcome"),
            &["outcome"],
        )?;
        let bookings = IntCounterVec::new(
            Opts::new("aura_bookings_total", "Booking attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(searches.clone()))?;
        registry.register(Box::new(bookings.clone()))?;

        Ok(Self { registry, searches, bookings })
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(export))
}

async fn export(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                String::new(),
            )
        }
    }
}
