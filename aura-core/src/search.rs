use async_trait::async_trait;
use aura_shared::{Airport, Flight, FlightSearchParams};

/// Upstream page cap; searches never return more offers than this.
pub const MAX_RESULTS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Credentials for the aggregator are missing from configuration
    #[error("Search API not configured: {0}")]
    NotConfigured(String),
    #[error("Failed to authenticate with search API: {0}")]
    Authentication(String),
    /// The aggregator rejected the request; carries its error detail
    #[error("{0}")]
    Upstream(String),
    #[error("Malformed search response: {0}")]
    InvalidResponse(String),
}

/// Flight search collaborator (the external aggregator API).
#[async_trait]
pub trait FlightSearchClient: Send + Sync {
    /// Search flight offers, at most [`MAX_RESULTS`].
    async fn search_flights(&self, params: &FlightSearchParams) -> Result<Vec<Flight>, SearchError>;

    /// Airport autocomplete. Failures yield an empty list.
    async fn airport_suggestions(&self, keyword: &str) -> Vec<Airport>;
}
