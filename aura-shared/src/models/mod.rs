pub mod booking;
pub mod filters;
pub mod flight;
pub mod search;
