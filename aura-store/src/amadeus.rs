//! Client for the Amadeus self-service flight offers API.
//!
//! Authenticates with the OAuth2 client-credentials grant and caches the
//! access token until shortly before it expires.

use async_trait::async_trait;
use aura_core::search::{FlightSearchClient, SearchError, MAX_RESULTS};
use aura_shared::{Airport, Flight, FlightSearchParams};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::app_config::{AmadeusConfig, SearchConfig};

/// Tokens are refreshed this long before their stated expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(300);
const AIRPORT_SUGGESTION_LIMIT: usize = 10;
const SEARCH_FAILED: &str = "Failed to search flights";

#[derive(Debug, Clone)]
struct Credentials {
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<Flight>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    data: Vec<Location>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    iata_code: String,
    name: String,
    address: Option<LocationAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationAddress {
    city_name: Option<String>,
}

pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(config: &AmadeusConfig, search: &SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(search.timeout_seconds))
            .build()
            .map_err(|e| SearchError::NotConfigured(format!("failed to build HTTP client: {}", e)))?;

        let credentials = match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => Some(Credentials {
                api_key: key.clone(),
                api_secret: secret.clone(),
            }),
            _ => {
                warn!("Amadeus credentials not configured; flight search is unavailable");
                None
            }
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, SearchError> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            SearchError::NotConfigured(
                "Amadeus API credentials not configured. Set AURA_AMADEUS__API_KEY and AURA_AMADEUS__API_SECRET"
                    .to_string(),
            )
        })?;

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_REFRESH_MARGIN < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Requesting Amadeus access token");
        let response = self
            .http
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", creds.api_key.as_str()),
                ("client_secret", creds.api_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Failed to get Amadeus access token: {}", e);
                SearchError::Authentication("Failed to authenticate with Amadeus API".to_string())
            })?;

        if !response.status().is_success() {
            error!("Amadeus token endpoint returned {}", response.status());
            return Err(SearchError::Authentication("Failed to authenticate with Amadeus API".to_string()));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Authentication(format!("invalid token response: {}", e)))?;

        *cached = Some(CachedToken {
            access_token: body.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        });
        Ok(body.access_token)
    }
}

fn search_query(params: &FlightSearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("originLocationCode", params.origin_location_code.clone()),
        ("destinationLocationCode", params.destination_location_code.clone()),
        ("departureDate", params.departure_date.to_string()),
        ("adults", params.adults.to_string()),
    ];
    if let Some(date) = params.return_date {
        query.push(("returnDate", date.to_string()));
    }
    if let Some(children) = params.children.filter(|c| *c > 0) {
        query.push(("children", children.to_string()));
    }
    if let Some(infants) = params.infants.filter(|i| *i > 0) {
        query.push(("infants", infants.to_string()));
    }
    if let Some(class) = params.travel_class {
        query.push(("travelClass", class.as_str().to_string()));
    }
    if let Some(non_stop) = params.non_stop {
        query.push(("nonStop", non_stop.to_string()));
    }
    query.push(("max", MAX_RESULTS.to_string()));
    query
}

#[async_trait]
impl FlightSearchClient for AmadeusClient {
    async fn search_flights(&self, params: &FlightSearchParams) -> Result<Vec<Flight>, SearchError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(format!("{}/v2/shopping/flight-offers", self.base_url))
            .query(&search_query(params))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!("Flight search error: {}", e);
                SearchError::Upstream(SEARCH_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.errors.into_iter().find_map(|d| d.detail))
                .unwrap_or_else(|| SEARCH_FAILED.to_string());
            warn!(status = %status, "Flight search rejected: {}", detail);
            return Err(SearchError::Upstream(detail));
        }

        let mut offers: FlightOffersResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        offers.data.truncate(MAX_RESULTS);
        debug!(count = offers.data.len(), "Flight offers received");
        Ok(offers.data)
    }

    async fn airport_suggestions(&self, keyword: &str) -> Vec<Airport> {
        let result: Result<LocationsResponse, SearchError> = async {
            let token = self.access_token().await?;
            let response = self
                .http
                .get(format!("{}/v1/reference-data/locations", self.base_url))
                .query(&[
                    ("subType", "AIRPORT".to_string()),
                    ("keyword", keyword.to_string()),
                    ("page[limit]", AIRPORT_SUGGESTION_LIMIT.to_string()),
                ])
                .bearer_auth(token)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| SearchError::Upstream(e.to_string()))?;
            response
                .json::<LocationsResponse>()
                .await
                .map_err(|e| SearchError::InvalidResponse(e.to_string()))
        }
        .await;

        match result {
            Ok(locations) => locations
                .data
                .into_iter()
                .map(|l| Airport {
                    city_name: l.address.and_then(|a| a.city_name).unwrap_or_default(),
                    iata_code: l.iata_code,
                    name: l.name,
                })
                .collect(),
            Err(e) => {
                warn!("Airport search error: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, with_credentials: bool) -> AmadeusClient {
        let config = AmadeusConfig {
            base_url: server.uri(),
            api_key: with_credentials.then(|| "key".to_string()),
            api_secret: with_credentials.then(|| "secret".to_string()),
        };
        AmadeusClient::new(&config, &SearchConfig { timeout_seconds: 5 }).unwrap()
    }

    fn params() -> FlightSearchParams {
        FlightSearchParams {
            origin_location_code: "JFK".to_string(),
            destination_location_code: "LHR".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            return_date: None,
            adults: 2,
            children: Some(0),
            infants: None,
            travel_class: None,
            non_stop: Some(true),
        }
    }

    fn offer(id: &str) -> serde_json::Value {
        json!({
            "type": "flight-offer",
            "id": id,
            "numberOfBookableSeats": 4,
            "itineraries": [{ "duration": "PT7H", "segments": [] }],
            "price": { "currency": "USD", "total": "432.10" },
            "validatingAirlineCodes": ["BA"]
        })
    }

    async fn mount_token(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-123",
                "expires_in": 1799
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_sends_params_and_caches_token() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v2/shopping/flight-offers"))
            .and(header("authorization", "Bearer tok-123"))
            .and(query_param("originLocationCode", "JFK"))
            .and(query_param("departureDate", "2024-12-01"))
            .and(query_param("adults", "2"))
            .and(query_param("nonStop", "true"))
            .and(query_param("max", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [offer("1"), offer("2")] })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, true);
        let flights = client.search_flights(&params()).await.unwrap();
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[1].id, "2");

        client.search_flights(&params()).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_without_credentials_is_config_error() {
        let server = MockServer::start().await;
        let client = client(&server, false);
        let err = client.search_flights(&params()).await.unwrap_err();
        assert!(matches!(err, SearchError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_search_surfaces_upstream_detail() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v2/shopping/flight-offers"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{ "status": 400, "code": 477, "title": "INVALID FORMAT", "detail": "departureDate is in the past" }]
            })))
            .mount(&server)
            .await;

        let err = client(&server, true).search_flights(&params()).await.unwrap_err();
        assert_eq!(err.to_string(), "departureDate is in the past");
    }

    #[tokio::test]
    async fn test_search_generic_message_when_no_detail() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v2/shopping/flight-offers"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client(&server, true).search_flights(&params()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to search flights");
    }

    #[tokio::test]
    async fn test_token_rejection_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server, true).search_flights(&params()).await.unwrap_err();
        assert!(matches!(err, SearchError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_airport_suggestions() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/reference-data/locations"))
            .and(query_param("subType", "AIRPORT"))
            .and(query_param("keyword", "LON"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "iataCode": "LHR",
                    "name": "HEATHROW",
                    "address": { "cityName": "LONDON" }
                }]
            })))
            .mount(&server)
            .await;

        let airports = client(&server, true).airport_suggestions("LON").await;
        assert_eq!(airports, vec![Airport {
            iata_code: "LHR".to_string(),
            name: "HEATHROW".to_string(),
            city_name: "LONDON".to_string(),
        }]);
    }

    #[tokio::test]
    async fn test_airport_suggestions_swallow_errors() {
        let server = MockServer::start().await;
        assert!(client(&server, false).airport_suggestions("LON").await.is_empty());
    }
}
