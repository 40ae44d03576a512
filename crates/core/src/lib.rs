pub mod admin;
pub mod config;
pub mod domain;
pub mod errors;
pub mod rental;

pub use admin::{ActionBinding, AdminAction, ReservationCard};
pub use domain::category::CarCategory;
pub use domain::rate::{RateEntry, RateTable};
pub use domain::reservation::{Reservation, ReservationId, ReservationStatus, ReservationUpdate};
pub use errors::{ApplicationError, InterfaceError, ValidationError};
pub use rental::{
    request::ReservationRequest, DeterministicReservationEngine, PricedReservation,
    ReservationEngine, ValidationInput,
};
