pub mod credits;
pub mod ledger;
pub mod orchestrator;

pub use credits::{CreditsLedger, STARTING_CREDITS};
pub use ledger::BookingLedger;
pub use orchestrator::{BookingError, BookingOrchestrator, BookingRequest, BookingRules};
