use async_trait::async_trait;
use thiserror::Error;

use rentdesk_core::domain::rate::{RateEntry, RateTable};
use rentdesk_core::domain::reservation::{Reservation, ReservationId, ReservationUpdate};
use rentdesk_core::rental::PricedReservation;

pub mod memory;
pub mod rate;
pub mod reservation;

pub use memory::{InMemoryRateRepository, InMemoryReservationRepository};
pub use rate::SqlRateRepository;
pub use reservation::SqlReservationRepository;

/// Storage layout for the naive local date-times of a booking.
pub const STORED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("reservation not found: {0}")]
    NotFound(ReservationId),
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Every stored reservation in insertion order.
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepositoryError>;
    async fn find_by_id(&self, id: &ReservationId)
        -> Result<Option<Reservation>, RepositoryError>;
    async fn create_reservation(
        &self,
        record: &PricedReservation,
    ) -> Result<ReservationId, RepositoryError>;
    async fn update_field(
        &self,
        id: &ReservationId,
        update: ReservationUpdate,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait RateRepository: Send + Sync {
    async fn list_rate_entries(&self) -> Result<RateTable, RepositoryError>;
    async fn save_rate(&self, entry: RateEntry) -> Result<(), RepositoryError>;
}
