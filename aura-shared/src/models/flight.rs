use serde::{Deserialize, Serialize};

// ============================================================================
// Flight Offer Models (aggregator wire shape)
// ============================================================================

/// A priced flight offer as returned by the search aggregator.
///
/// Offers are treated as immutable snapshots: bookings embed a full copy so
/// later searches never alter booking history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub price: Price,
    pub itineraries: Vec<Itinerary>,
    #[serde(default)]
    pub number_of_bookable_seats: u32,
    pub validating_airline_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ticketing_date: Option<String>,
}

impl Flight {
    /// The outbound itinerary, used for all stop and duration math.
    pub fn outbound(&self) -> Option<&Itinerary> {
        self.itineraries.first()
    }

    /// Total price as a number, `None` when the decimal string is malformed.
    pub fn price_amount(&self) -> Option<f64> {
        self.price.amount()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Decimal string, e.g. "546.70"
    pub total: String,
    pub currency: String,
}

impl Price {
    pub fn amount(&self) -> Option<f64> {
        self.total
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub carrier_code: String,
    pub number: String,
    pub aircraft: Aircraft,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub number_of_stops: u32,
}

/// Departure or arrival point of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub iata_code: String,
    pub at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub code: String,
}

/// One bar of the price distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDataPoint {
    /// Bucket value (price rounded to the bucket width), as a label
    pub bucket: String,
    /// Mean price of the flights in the bucket, rounded
    pub price: i64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_offer_deserialization() {
        let json = r#"
            {
                "type": "flight-offer",
                "id": "1",
                "source": "GDS",
                "lastTicketingDate": "2024-11-30",
                "numberOfBookableSeats": 9,
                "itineraries": [{
                    "duration": "PT7H10M",
                    "segments": [{
                        "departure": { "iataCode": "JFK", "terminal": "7", "at": "2024-12-01T18:00:00" },
                        "arrival": { "iataCode": "LHR", "at": "2024-12-02T06:10:00" },
                        "carrierCode": "BA",
                        "number": "178",
                        "aircraft": { "code": "777" },
                        "duration": "PT7H10M",
                        "numberOfStops": 0
                    }]
                }],
                "price": { "currency": "USD", "total": "546.70", "base": "400.00" },
                "validatingAirlineCodes": ["BA"]
            }
        "#;
        let flight: Flight = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(flight.id, "1");
        assert_eq!(flight.number_of_bookable_seats, 9);
        assert_eq!(flight.outbound().unwrap().segments[0].departure.terminal.as_deref(), Some("7"));
        assert_eq!(flight.price_amount(), Some(546.70));
        assert_eq!(flight.last_ticketing_date.as_deref(), Some("2024-11-30"));
    }

    #[test]
    fn test_malformed_price_has_no_amount() {
        let price = Price { total: "n/a".to_string(), currency: "USD".to_string() };
        assert_eq!(price.amount(), None);
    }
}
