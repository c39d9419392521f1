//! Display facts derived from flight offers: stops, airline names, durations
//! and the price distribution used for charting.

use aura_shared::{Flight, PriceDataPoint, PriceRange};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Width of a price histogram bucket.
pub const PRICE_BUCKET_WIDTH: f64 = 50.0;

/// Range reported for an empty result set (slider defaults).
const EMPTY_PRICE_RANGE: PriceRange = PriceRange { min: 0.0, max: 1000.0 };

static HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)h").expect("valid regex"));
static MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)m").expect("valid regex"));

/// Stops on the outbound itinerary: one fewer than its segment count, floored at zero.
pub fn total_stops(flight: &Flight) -> u32 {
    let segments = flight.outbound().map(|i| i.segments.len()).unwrap_or(0);
    segments.saturating_sub(1) as u32
}

pub fn stops_label(stops: u32) -> String {
    match stops {
        0 => "Non-stop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

/// Display name for a carrier code. Unknown codes pass through unchanged.
pub fn airline_name(code: &str) -> &str {
    match code {
        "AA" => "American Airlines",
        "UA" => "United Airlines",
        "DL" => "Delta Air Lines",
        "BA" => "British Airways",
        "LH" => "Lufthansa",
        "AF" => "Air France",
        "KL" => "KLM",
        "VS" => "Virgin Atlantic",
        "WN" => "Southwest Airlines",
        "AS" => "Alaska Airlines",
        "B6" => "JetBlue Airways",
        "AI" => "Air India",
        "SG" => "SpiceJet",
        "IX" => "Air India Express",
        "HR" => "Hahn Air",
        other => other,
    }
}

/// Parse a compact duration such as `2h30m` or `PT2H30M` into minutes.
///
/// Missing components count as zero, so unparseable text yields 0.
pub fn duration_minutes(text: &str) -> u32 {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    capture(&HOURS).saturating_mul(60).saturating_add(capture(&MINUTES))
}

/// Outbound duration of a flight in minutes.
pub fn outbound_minutes(flight: &Flight) -> u32 {
    flight.outbound().map(|i| duration_minutes(&i.duration)).unwrap_or(0)
}

// Half-up rounding, so x.5 always goes up regardless of sign.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Group prices into buckets of [`PRICE_BUCKET_WIDTH`] (nearest multiple) and
/// report the mean price and count per non-empty bucket, ascending.
///
/// Flights with an unparseable price are skipped.
pub fn price_histogram(flights: &[Flight]) -> Vec<PriceDataPoint> {
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();

    for price in flights.iter().filter_map(Flight::price_amount) {
        let bucket = (round_half_up(price / PRICE_BUCKET_WIDTH) * PRICE_BUCKET_WIDTH) as i64;
        let entry = buckets.entry(bucket).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(bucket, (total, count))| PriceDataPoint {
            bucket: bucket.to_string(),
            price: round_half_up(total / count as f64) as i64,
            count,
        })
        .collect()
}

/// Sorted, de-duplicated validating airline codes across all flights.
pub fn unique_airlines(flights: &[Flight]) -> Vec<String> {
    flights
        .iter()
        .flat_map(|f| f.validating_airline_codes.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Cheapest and most expensive price; `0..1000` when there is nothing to measure.
pub fn price_range(flights: &[Flight]) -> PriceRange {
    let prices: Vec<f64> = flights.iter().filter_map(Flight::price_amount).collect();
    if prices.is_empty() {
        return EMPTY_PRICE_RANGE;
    }
    PriceRange {
        min: prices.iter().copied().fold(f64::INFINITY, f64::min),
        max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}
