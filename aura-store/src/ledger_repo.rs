use async_trait::async_trait;
use aura_core::repository::{LedgerRepository, RepoError};
use aura_shared::Booking;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::kv::{KeyValueStore, StoreError};

pub const CREDITS_KEY: &str = "credits-storage";
pub const BOOKINGS_KEY: &str = "booking-storage";
pub const CURRENCY_KEY: &str = "currency-storage";

/// Stores each ledger as one JSON record in a [`KeyValueStore`].
pub struct KvLedgerRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvLedgerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load<T: DeserializeOwned + Default + Send>(&self, key: &str) -> Result<T, StoreError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize + ?Sized + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }
}

#[async_trait]
impl LedgerRepository for KvLedgerRepository {
    async fn load_credits(&self) -> Result<HashMap<String, u64>, RepoError> {
        Ok(self.load(CREDITS_KEY).await?)
    }

    async fn save_credits(&self, balances: &HashMap<String, u64>) -> Result<(), RepoError> {
        Ok(self.save(CREDITS_KEY, balances).await?)
    }

    async fn load_bookings(&self) -> Result<Vec<Booking>, RepoError> {
        Ok(self.load(BOOKINGS_KEY).await?)
    }

    async fn save_bookings(&self, bookings: &[Booking]) -> Result<(), RepoError> {
        Ok(self.save(BOOKINGS_KEY, bookings).await?)
    }

    async fn load_currency_preferences(&self) -> Result<HashMap<String, String>, RepoError> {
        Ok(self.load(CURRENCY_KEY).await?)
    }

    async fn save_currency_preferences(&self, preferences: &HashMap<String, String>) -> Result<(), RepoError> {
        Ok(self.save(CURRENCY_KEY, preferences).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use aura_shared::{BookingStatus, Flight, Itinerary, Price};

    fn booking() -> Booking {
        Booking {
            id: "booking-1700000000000-abc123xyz".to_string(),
            flight: Flight {
                id: "7".to_string(),
                price: Price { total: "410.20".to_string(), currency: "EUR".to_string() },
                itineraries: vec![Itinerary { duration: "PT2H5M".to_string(), segments: vec![] }],
                number_of_bookable_seats: 3,
                validating_airline_codes: vec!["AF".to_string()],
                last_ticketing_date: Some("2024-11-30".to_string()),
            },
            booking_date: chrono::Utc::now(),
            passenger_count: 2,
            status: BookingStatus::Confirmed,
            user_id: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let repo = KvLedgerRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.load_credits().await.unwrap().is_empty());
        assert!(repo.load_bookings().await.unwrap().is_empty());
        assert!(repo.load_currency_preferences().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let booked = booking();
        let repo = KvLedgerRepository::new(store.clone());
        repo.save_credits(&HashMap::from([("u1".to_string(), 750)])).await.unwrap();
        repo.save_bookings(std::slice::from_ref(&booked)).await.unwrap();
        repo.save_currency_preferences(&HashMap::from([("u1".to_string(), "EUR".to_string())]))
            .await
            .unwrap();

        let reopened = KvLedgerRepository::new(store.clone());
        assert_eq!(reopened.load_credits().await.unwrap()["u1"], 750);
        assert_eq!(reopened.load_bookings().await.unwrap(), vec![booked]);
        assert_eq!(reopened.load_currency_preferences().await.unwrap()["u1"], "EUR");

        let raw = store.get(BOOKINGS_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"status\":\"confirmed\""));
        assert!(raw.contains("\"validatingAirlineCodes\":[\"AF\"]"));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(CREDITS_KEY, "not json").await.unwrap();
        let repo = KvLedgerRepository::new(store);
        assert!(repo.load_credits().await.is_err());
    }
}
