//! Domain layer
//!
//! - `booking`: availability and price calculation for a proposed stay
//! - `villa`: villa records and the catalog port
//! - `reservation`: reservations and the reservation service port

pub mod booking;
pub mod credentials;
pub mod reservation;
pub mod villa;

pub use booking::{
    BookedInterval, PriceBreakdown, PricingParameters, ProposedStay, StayEvaluation,
};
pub use credentials::Credentials;
pub use reservation::{Reservation, ReservationGateway, ReservationRequest};
pub use villa::{Villa, VillaCatalog, VillaFilter, VillaImage, VillaInput};

pub use crate::shared::errors::{AppError, AppResult, DomainError};
