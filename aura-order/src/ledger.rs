use aura_shared::{Booking, BookingStatus, NewBooking};
use chrono::Utc;
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Append-only list of bookings.
///
/// Bookings are never removed once committed; cancellation flips the status
/// in place.
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted bookings, keeping their order.
    pub fn from_snapshot(bookings: Vec<Booking>) -> Self {
        Self { bookings }
    }

    /// Append a confirmed booking with a fresh id and the current timestamp.
    ///
    /// Callers must have committed the credits debit first.
    pub fn create(&mut self, new: NewBooking) -> Booking {
        let booking = Booking {
            id: self.fresh_id(),
            flight: new.flight,
            booking_date: Utc::now(),
            passenger_count: new.passenger_count,
            status: BookingStatus::Confirmed,
            user_id: new.user_id,
        };
        self.bookings.push(booking.clone());
        booking
    }

    /// Cancel a booking. Unknown or already cancelled ids are a no-op.
    /// Returns the booking if this call cancelled it.
    pub fn cancel(&mut self, booking_id: &str) -> Option<Booking> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id && b.is_active())?;
        booking.status = BookingStatus::Cancelled;
        Some(booking.clone())
    }

    pub fn get(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }

    /// A user's bookings, excluding cancelled ones, in insertion order.
    pub fn bookings_for(&self, user_id: &str) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|b| b.user_id == user_id && b.is_active())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn snapshot(&self) -> &[Booking] {
        &self.bookings
    }

    /// Roll back the most recent append when it could not be persisted.
    pub(crate) fn discard_uncommitted(&mut self, booking_id: &str) {
        if self.bookings.last().is_some_and(|b| b.id == booking_id) {
            self.bookings.pop();
        }
    }

    /// `booking-<unix millis>-<9 base36 chars>`, regenerated on collision.
    fn fresh_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            let id = format!("booking-{}-{}", Utc::now().timestamp_millis(), suffix);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_shared::{Flight, Itinerary, Price};
    use std::collections::HashSet;

    fn flight(id: &str) -> Flight {
        Flight {
            id: id.to_string(),
            price: Price { total: "250.00".to_string(), currency: "USD".to_string() },
            itineraries: vec![Itinerary { duration: "PT2H".to_string(), segments: vec![] }],
            number_of_bookable_seats: 4,
            validating_airline_codes: vec!["UA".to_string()],
            last_ticketing_date: None,
        }
    }

    fn new_booking(user: &str) -> NewBooking {
        NewBooking { flight: flight("f1"), passenger_count: 2, user_id: user.to_string() }
    }

    #[test]
    fn test_create_assigns_confirmed_status_and_unique_ids() {
        let mut ledger = BookingLedger::new();
        let mut ids = HashSet::new();

        for _ in 0..200 {
            let booking = ledger.create(new_booking("u1"));
            assert_eq!(booking.status, BookingStatus::Confirmed);
            assert!(booking.id.starts_with("booking-"));
            assert!(ids.insert(booking.id));
        }
        assert_eq!(ledger.len(), 200);
    }

    #[test]
    fn test_cancel_only_changes_status() {
        let mut ledger = BookingLedger::new();
        let original = ledger.create(new_booking("u1"));

        let cancelled = ledger.cancel(&original.id).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(Booking { status: BookingStatus::Confirmed, ..cancelled }, original);

        // already cancelled: no-op
        assert!(ledger.cancel(&original.id).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_cancel_unknown_id_is_noop() {
        let mut ledger = BookingLedger::new();
        ledger.create(new_booking("u1"));
        assert!(ledger.cancel("booking-0-missing").is_none());
        assert_eq!(ledger.bookings_for("u1").len(), 1);
    }

    #[test]
    fn test_bookings_for_excludes_cancelled_and_other_users() {
        let mut ledger = BookingLedger::new();
        let a = ledger.create(new_booking("u1"));
        let b = ledger.create(new_booking("u1"));
        ledger.create(new_booking("u2"));
        let c = ledger.create(new_booking("u1"));

        ledger.cancel(&b.id);

        let ids: Vec<String> = ledger.bookings_for("u1").into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert!(ledger.bookings_for("u1").iter().all(|b| b.status != BookingStatus::Cancelled));
    }

    #[test]
    fn test_snapshot_keeps_flight_copy() {
        let mut ledger = BookingLedger::new();
        let mut source = flight("f9");
        let booking = ledger.create(NewBooking { flight: source.clone(), passenger_count: 1, user_id: "u1".to_string() });

        source.price.total = "999.00".to_string();

        let restored = BookingLedger::from_snapshot(ledger.snapshot().to_vec());
        assert_eq!(restored.get(&booking.id).unwrap().flight.price.total, "250.00");
    }

    #[test]
    fn test_discard_uncommitted_only_pops_matching_tail() {
        let mut ledger = BookingLedger::new();
        let first = ledger.create(new_booking("u1"));
        let second = ledger.create(new_booking("u1"));

        ledger.discard_uncommitted(&first.id);
        assert_eq!(ledger.len(), 2);

        ledger.discard_uncommitted(&second.id);
        assert_eq!(ledger.len(), 1);
    }
}
