use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Client-side constraints over a search result set.
///
/// Every field is independently optional; an empty set or `None` means
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Any-match against a flight's validating airline codes
    #[serde(default)]
    pub airlines: BTreeSet<String>,
    /// Accepted stop counts (0 = non-stop)
    #[serde(default)]
    pub stops: BTreeSet<u32>,
    pub duration: Option<DurationWindow>,
}

/// Inclusive outbound duration window, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationWindow {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl FlightFilters {
    /// True when no predicate would reject any flight.
    pub fn is_unconstrained(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.airlines.is_empty()
            && self.stops.is_empty()
            && self.duration.is_none()
    }

    /// Shallow field overwrite: fields present in the update replace ours.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(min_price) = update.min_price {
            self.min_price = min_price;
        }
        if let Some(max_price) = update.max_price {
            self.max_price = max_price;
        }
        if let Some(airlines) = update.airlines {
            self.airlines = airlines;
        }
        if let Some(stops) = update.stops {
            self.stops = stops;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
    }
}

/// Typed partial update of [`FlightFilters`].
///
/// For the nullable fields the outer `Option` says whether the field is
/// present at all; `Some(None)` (JSON `null`) clears the constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterUpdate {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airlines: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<BTreeSet<u32>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Option<DurationWindow>>,
}

// Only invoked when the key exists, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
