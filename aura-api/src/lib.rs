use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod credits;
pub mod currency;
pub mod error;
pub mod flights;
pub mod metrics;
pub mod middleware;
pub mod search;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // everything except health and metrics needs an identity token
    let authenticated = Router::new()
        .merge(auth::routes())
        .merge(search::routes())
        .merge(flights::routes())
        .merge(currency::routes())
        .merge(credits::routes())
        .merge(bookings::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::identity_middleware,
        ));

    let v1 = Router::new()
        .route("/health", get(health))
        .merge(metrics::routes())
        .merge(authenticated);

    Router::new()
        .nest("/v1", v1)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
