pub mod flight_utils;
pub mod filter;

pub use filter::{apply_filters, FlightFilterEngine};

#[cfg(test)]
pub(crate) mod fixtures {
    use aura_shared::{Aircraft, Endpoint, Flight, Itinerary, Price, Segment};

    pub fn segment(from: &str, to: &str, carrier: &str) -> Segment {
        Segment {
            departure: Endpoint { iata_code: from.to_string(), at: "2024-12-01T08:00:00".to_string(), terminal: None },
            arrival: Endpoint { iata_code: to.to_string(), at: "2024-12-01T11:00:00".to_string(), terminal: None },
            carrier_code: carrier.to_string(),
            number: "100".to_string(),
            aircraft: Aircraft { code: "320".to_string() },
            duration: "PT3H".to_string(),
            number_of_stops: 0,
        }
    }

    /// A flight with `legs` outbound segments on `airline`.
    pub fn flight(id: &str, price: &str, airline: &str, legs: usize, duration: &str) -> Flight {
        let airports = ["JFK", "ORD", "DEN", "LAX", "SFO"];
        let segments = (0..legs)
            .map(|i| segment(airports[i % 5], airports[(i + 1) % 5], airline))
            .collect();
        Flight {
            id: id.to_string(),
            price: Price { total: price.to_string(), currency: "USD".to_string() },
            itineraries: vec![Itinerary { duration: duration.to_string(), segments }],
            number_of_bookable_seats: 9,
            validating_airline_codes: vec![airline.to_string()],
            last_ticketing_date: None,
        }
    }
}
