use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;

use super::flight::Flight;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    /// Reserved; nothing currently produces it
    Pending,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A booked flight. The flight is a value copy taken at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub flight: Flight,
    pub booking_date: DateTime<Utc>,
    pub passenger_count: u32,
    pub status: BookingStatus,
    pub user_id: String,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Input for creating a booking; id, timestamp and status are assigned by the ledger.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub flight: Flight,
    pub passenger_count: u32,
    pub user_id: String,
}
