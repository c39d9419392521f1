use aura_shared::{FilterUpdate, Flight, FlightFilters};

use crate::flight_utils::{outbound_minutes, total_stops};

/// Apply every active constraint in `filters` to `flights`.
///
/// Constraints are independent and AND-composed; the output keeps input
/// order. A flight whose price cannot be parsed fails any active price bound.
pub fn apply_filters(flights: &[Flight], filters: &FlightFilters) -> Vec<Flight> {
    if filters.is_unconstrained() {
        return flights.to_vec();
    }
    flights
        .iter()
        .filter(|f| matches(f, filters))
        .cloned()
        .collect()
}

fn matches(flight: &Flight, filters: &FlightFilters) -> bool {
    let price = flight.price_amount();

    if let Some(min) = filters.min_price {
        if !price.is_some_and(|p| p >= min) {
            return false;
        }
    }
    if let Some(max) = filters.max_price {
        if !price.is_some_and(|p| p <= max) {
            return false;
        }
    }

    if !filters.airlines.is_empty()
        && !flight
            .validating_airline_codes
            .iter()
            .any(|code| filters.airlines.contains(code))
    {
        return false;
    }

    if !filters.stops.is_empty() && !filters.stops.contains(&total_stops(flight)) {
        return false;
    }

    if let Some(window) = filters.duration {
        let minutes = outbound_minutes(flight);
        if window.min.is_some_and(|min| minutes < min) {
            return false;
        }
        if window.max.is_some_and(|max| minutes > max) {
            return false;
        }
    }

    true
}

/// Holds a search result set and the active filters, and keeps the filtered
/// view in sync whenever either changes.
#[derive(Debug, Clone, Default)]
pub struct FlightFilterEngine {
    results: Vec<Flight>,
    filters: FlightFilters,
    filtered: Vec<Flight>,
}

impl FlightFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set and recompute the view.
    pub fn set_results(&mut self, results: Vec<Flight>) {
        self.results = results;
        self.recompute();
    }

    /// Merge a partial filter update and recompute the view.
    pub fn set_filters(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
        self.recompute();
    }

    /// Drop results and filters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn results(&self) -> &[Flight] {
        &self.results
    }

    pub fn filtered(&self) -> &[Flight] {
        &self.filtered
    }

    pub fn filters(&self) -> &FlightFilters {
        &self.filters
    }

    /// Look up a flight in the full result set.
    pub fn find(&self, flight_id: &str) -> Option<&Flight> {
        self.results.iter().find(|f| f.id == flight_id)
    }

    fn recompute(&mut self) {
        self.filtered = apply_filters(&self.results, &self.filters);
        tracing::debug!(
            total = self.results.len(),
            visible = self.filtered.len(),
            "Filtered view recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::flight;
    use aura_shared::DurationWindow;

    fn sample() -> Vec<Flight> {
        vec![
            flight("1", "120.00", "BA", 1, "PT7H10M"),
            flight("2", "340.50", "LH", 2, "PT9H"),
            flight("3", "89.99", "AA", 3, "PT12H30M"),
            flight("4", "510.00", "BA", 2, "PT8H45M"),
        ]
    }

    fn ids(flights: &[Flight]) -> Vec<&str> {
        flights.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_no_constraints_returns_everything() {
        let flights = sample();
        assert_eq!(apply_filters(&flights, &FlightFilters::default()), flights);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filters = FlightFilters { min_price: Some(120.0), max_price: Some(340.5), ..Default::default() };
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["1", "2"]);
    }

    #[test]
    fn test_airline_any_match() {
        let mut codeshare = flight("5", "200", "KL", 1, "PT5H");
        codeshare.validating_airline_codes.push("AF".to_string());

        let mut flights = sample();
        flights.push(codeshare);

        let filters = FlightFilters {
            airlines: ["AF".to_string(), "AA".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&flights, &filters)), vec!["3", "5"]);
    }

    #[test]
    fn test_stops_and_duration() {
        let filters = FlightFilters {
            stops: [1].into_iter().collect(),
            duration: Some(DurationWindow { min: None, max: Some(9 * 60) }),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["2", "4"]);

        let filters = FlightFilters {
            duration: Some(DurationWindow { min: Some(8 * 60 + 45), max: None }),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_unparseable_price_fails_price_bound() {
        let flights = vec![flight("1", "oops", "BA", 1, "PT1H")];
        let filters = FlightFilters { max_price: Some(1000.0), ..Default::default() };
        assert!(apply_filters(&flights, &filters).is_empty());
        assert_eq!(apply_filters(&flights, &FlightFilters::default()).len(), 1);
    }

    #[test]
    fn test_apply_is_subset_and_idempotent() {
        let flights = sample();
        let filter_sets = vec![
            FlightFilters { min_price: Some(100.0), ..Default::default() },
            FlightFilters { stops: [0, 2].into_iter().collect(), ..Default::default() },
            FlightFilters {
                airlines: ["BA".to_string()].into_iter().collect(),
                max_price: Some(400.0),
                duration: Some(DurationWindow { min: Some(60), max: Some(600) }),
                ..Default::default()
            },
        ];

        for filters in filter_sets {
            let once = apply_filters(&flights, &filters);
            assert!(once.iter().all(|f| flights.contains(f)));
            assert_eq!(apply_filters(&once, &filters), once);
        }
    }

    #[test]
    fn test_engine_recomputes_on_every_change() {
        let mut engine = FlightFilterEngine::new();
        engine.set_filters(FilterUpdate { max_price: Some(Some(200.0)), ..Default::default() });
        assert!(engine.filtered().is_empty());

        engine.set_results(sample());
        assert_eq!(ids(engine.filtered()), vec!["1", "3"]);
        assert_eq!(engine.results().len(), 4);

        engine.set_filters(FilterUpdate { stops: Some([0].into_iter().collect()), ..Default::default() });
        assert_eq!(ids(engine.filtered()), vec!["1"]);

        engine.set_filters(FilterUpdate { max_price: Some(None), stops: Some(Default::default()), ..Default::default() });
        assert_eq!(engine.filtered().len(), 4);
        assert!(engine.find("3").is_some());

        engine.reset();
        assert!(engine.results().is_empty());
        assert!(engine.filters().is_unconstrained());
    }
}
