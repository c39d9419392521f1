use aura_core::currency;
use aura_core::repository::LedgerRepository;
use aura_shared::{Booking, Flight, NewBooking};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::credits::{CreditsLedger, STARTING_CREDITS};
use crate::ledger::BookingLedger;

/// Tunables for the booking flow.
#[derive(Debug, Clone)]
pub struct BookingRules {
    pub starting_credits: u64,
    /// Artificial pause between the debit and the booking record
    pub booking_delay: Duration,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            starting_credits: STARTING_CREDITS,
            booking_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: String,
    pub flight: Flight,
    pub passenger_count: u32,
    /// Currency the user pays in; one credit equals one unit of it
    pub currency: String,
}

struct Ledgers {
    credits: CreditsLedger,
    bookings: BookingLedger,
}

/// Runs the debit-then-create booking sequence over the two ledgers and
/// writes every mutation through to the repository.
pub struct BookingOrchestrator {
    ledgers: Mutex<Ledgers>,
    in_flight: std::sync::Mutex<HashSet<String>>,
    repo: Arc<dyn LedgerRepository>,
    rules: BookingRules,
}

/// Marks a user's booking as in flight until dropped.
struct InFlightGuard<'a> {
    set: &'a std::sync::Mutex<HashSet<String>>,
    user_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.user_id);
        }
    }
}

impl BookingOrchestrator {
    /// Restore both ledgers from the repository.
    pub async fn load(repo: Arc<dyn LedgerRepository>, rules: BookingRules) -> Result<Self, BookingError> {
        let balances = repo.load_credits().await.map_err(|e| BookingError::Storage(e.to_string()))?;
        let bookings = repo.load_bookings().await.map_err(|e| BookingError::Storage(e.to_string()))?;
        info!(users = balances.len(), bookings = bookings.len(), "Ledgers restored");

        Ok(Self {
            ledgers: Mutex::new(Ledgers {
                credits: CreditsLedger::from_snapshot(balances, rules.starting_credits),
                bookings: BookingLedger::from_snapshot(bookings),
            }),
            in_flight: std::sync::Mutex::new(HashSet::new()),
            repo,
            rules,
        })
    }

    /// Credits one unit of `currency` buys per flight: the converted price, rounded up.
    pub fn price_in_credits(flight: &Flight, currency: &str) -> Result<u64, BookingError> {
        let amount = flight
            .price_amount()
            .filter(|a| *a >= 0.0)
            .ok_or_else(|| BookingError::InvalidPrice(flight.price.total.clone()))?;
        Ok(currency::convert(amount, &flight.price.currency, currency).ceil() as u64)
    }

    /// Identity callback: make sure a first-time user has a starting balance.
    pub async fn initialize_user(&self, user_id: &str) -> Result<u64, BookingError> {
        let mut ledgers = self.ledgers.lock().await;
        if ledgers.credits.initialize(user_id) {
            self.persist_credits(&ledgers.credits).await?;
            info!(user_id, credits = self.rules.starting_credits, "Credits initialized");
        }
        Ok(ledgers.credits.balance_of(user_id))
    }

    pub async fn balance_of(&self, user_id: &str) -> u64 {
        self.ledgers.lock().await.credits.balance_of(user_id)
    }

    /// Top up a balance. Returns the new balance.
    pub async fn add_credits(&self, user_id: &str, amount: u64) -> Result<u64, BookingError> {
        if amount == 0 {
            return Err(BookingError::InvalidAmount("Amount must be positive".to_string()));
        }
        let mut ledgers = self.ledgers.lock().await;
        ledgers.credits.credit(user_id, amount);
        self.persist_credits(&ledgers.credits).await?;
        info!(user_id, amount, "Credits added");
        Ok(ledgers.credits.balance_of(user_id))
    }

    /// Debit the flight price, then record a confirmed booking.
    ///
    /// The sequence runs on its own task, so it completes even when the
    /// caller stops waiting. A failure after the debit refunds it.
    pub async fn book(self: &Arc<Self>, req: BookingRequest) -> Result<Booking, BookingError> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run_booking(req).await })
            .await
            .map_err(|e| BookingError::Storage(format!("booking task failed: {}", e)))?
    }

    async fn run_booking(&self, req: BookingRequest) -> Result<Booking, BookingError> {
        let _guard = self.begin(&req.user_id)?;
        let required = Self::price_in_credits(&req.flight, &req.currency)?;

        {
            let mut ledgers = self.ledgers.lock().await;
            if !ledgers.credits.debit(&req.user_id, required) {
                let available = ledgers.credits.balance_of(&req.user_id);
                warn!(user_id = %req.user_id, required, available, "Insufficient credits");
                return Err(BookingError::InsufficientCredits { required, available });
            }
            if let Err(e) = self.persist_credits(&ledgers.credits).await {
                ledgers.credits.credit(&req.user_id, required);
                return Err(e);
            }
        }

        if !self.rules.booking_delay.is_zero() {
            tokio::time::sleep(self.rules.booking_delay).await;
        }

        let mut ledgers = self.ledgers.lock().await;
        let booking = ledgers.bookings.create(NewBooking {
            flight: req.flight,
            passenger_count: req.passenger_count,
            user_id: req.user_id.clone(),
        });

        if let Err(e) = self.persist_bookings(&ledgers.bookings).await {
            ledgers.bookings.discard_uncommitted(&booking.id);
            ledgers.credits.credit(&req.user_id, required);
            if let Err(refund_err) = self.persist_credits(&ledgers.credits).await {
                error!(user_id = %req.user_id, "Failed to persist refund: {}", refund_err);
            }
            warn!(user_id = %req.user_id, required, "Booking failed, credits refunded");
            return Err(e);
        }

        info!(booking_id = %booking.id, user_id = %req.user_id, credits = required, "Booking confirmed");
        Ok(booking)
    }

    /// Cancel one of the user's bookings. Unknown ids are a no-op (`Ok(None)`).
    /// Credits are not returned.
    pub async fn cancel(&self, user_id: &str, booking_id: &str) -> Result<Option<Booking>, BookingError> {
        let mut ledgers = self.ledgers.lock().await;

        match ledgers.bookings.get(booking_id) {
            None => return Ok(None),
            Some(b) if b.user_id != user_id => return Err(BookingError::NotOwner(booking_id.to_string())),
            Some(_) => {}
        }

        let Some(cancelled) = ledgers.bookings.cancel(booking_id) else {
            return Ok(None);
        };
        self.persist_bookings(&ledgers.bookings).await?;

        info!(booking_id, user_id, status = %cancelled.status, "Booking cancelled");
        Ok(Some(cancelled))
    }

    pub async fn bookings_for(&self, user_id: &str) -> Vec<Booking> {
        self.ledgers.lock().await.bookings.bookings_for(user_id)
    }

    fn begin(&self, user_id: &str) -> Result<InFlightGuard<'_>, BookingError> {
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| BookingError::Storage("in-flight set poisoned".to_string()))?;
        if !set.insert(user_id.to_string()) {
            return Err(BookingError::InProgress);
        }
        Ok(InFlightGuard { set: &self.in_flight, user_id: user_id.to_string() })
    }

    async fn persist_credits(&self, credits: &CreditsLedger) -> Result<(), BookingError> {
        self.repo
            .save_credits(credits.snapshot())
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))
    }

    async fn persist_bookings(&self, bookings: &BookingLedger) -> Result<(), BookingError> {
        self.repo
            .save_bookings(bookings.snapshot())
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Insufficient credits. You need {required} credits but only have {available}.")]
    InsufficientCredits { required: u64, available: u64 },

    #[error("A booking is already in progress")]
    InProgress,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Flight price cannot be converted to credits: {0}")]
    InvalidPrice(String),

    #[error("Booking belongs to another user: {0}")]
    NotOwner(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
