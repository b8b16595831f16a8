//! Application layer: use cases on top of the domain ports

pub mod booking;

pub use booking::{BookingQuote, BookingService, CalendarDay, CalendarView, MAX_CALENDAR_DAYS};
