use async_trait::async_trait;
use aura_shared::Booking;
use std::collections::HashMap;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Durable storage for the credits ledger, the booking ledger and the
/// per-user currency preference. Each record is saved as a whole.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn load_credits(&self) -> Result<HashMap<String, u64>, RepoError>;

    async fn save_credits(&self, balances: &HashMap<String, u64>) -> Result<(), RepoError>;

    async fn load_bookings(&self) -> Result<Vec<Booking>, RepoError>;

    async fn save_bookings(&self, bookings: &[Booking]) -> Result<(), RepoError>;

    async fn load_currency_preferences(&self) -> Result<HashMap<String, String>, RepoError>;

    async fn save_currency_preferences(&self, preferences: &HashMap<String, String>) -> Result<(), RepoError>;
}
