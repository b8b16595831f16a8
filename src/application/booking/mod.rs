pub mod model;
pub mod service;

pub use model::{BookingQuote, CalendarDay, CalendarView};
pub use service::{BookingService, MAX_CALENDAR_DAYS};
