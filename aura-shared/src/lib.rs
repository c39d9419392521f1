pub mod models;
pub mod pii;

pub use models::booking::{Booking, BookingStatus, NewBooking};
pub use models::filters::{DurationWindow, FilterUpdate, FlightFilters};
pub use models::flight::{Aircraft, Endpoint, Flight, Itinerary, Price, PriceDataPoint, PriceRange, Segment};
pub use models::search::{Airport, FlightSearchParams, TravelClass};
