use serde::{Deserialize, Serialize};

/// Parameters of a flight search, sent to the aggregator as query params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchParams {
    pub origin_location_code: String,
    pub destination_location_code: String,
    /// ISO date, e.g. 2024-12-25
    pub departure_date: chrono::NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<chrono::NaiveDate>,
    pub adults: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_class: Option<TravelClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_stop: Option<bool>,
}

impl FlightSearchParams {
    pub fn validate(&self) -> Result<(), String> {
        if !is_iata_code(&self.origin_location_code) {
            return Err(format!("Invalid origin code: {}", self.origin_location_code));
        }
        if !is_iata_code(&self.destination_location_code) {
            return Err(format!("Invalid destination code: {}", self.destination_location_code));
        }
        if self.adults == 0 {
            return Err("At least one adult is required".to_string());
        }
        if let Some(ret) = self.return_date {
            if ret < self.departure_date {
                return Err("Return date is before departure date".to_string());
            }
        }
        Ok(())
    }
}

fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

/// Airport suggestion for origin/destination autocomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub iata_code: String,
    pub name: String,
    pub city_name: String,
}
