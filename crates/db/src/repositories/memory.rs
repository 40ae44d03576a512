use chrono::Utc;
use tokio::sync::RwLock;

use rentdesk_core::domain::rate::{RateEntry, RateTable};
use rentdesk_core::domain::reservation::{Reservation, ReservationId, ReservationUpdate};
use rentdesk_core::rental::PricedReservation;

use super::{RateRepository, RepositoryError, ReservationRepository};

/// Keeps reservations in a `Vec` so listing order matches insertion order.
#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: RwLock<Vec<Reservation>>,
}

#[async_trait::async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let reservations = self.reservations.read().await;
        Ok(reservations.clone())
    }

    async fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<Reservation>, RepositoryError> {
        let reservations = self.reservations.read().await;
        Ok(reservations.iter().find(|reservation| &reservation.id == id).cloned())
    }

    async fn create_reservation(
        &self,
        record: &PricedReservation,
    ) -> Result<ReservationId, RepositoryError> {
        let id = ReservationId::generate();
        let mut reservations = self.reservations.write().await;
        reservations.push(Reservation {
            id: id.clone(),
            driver_name: record.driver_name.clone(),
            category: record.category,
            reservation_start: record.reservation_start,
            return_at: record.return_at,
            status: record.status,
            total_charge: Some(record.total_charge),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update_field(
        &self,
        id: &ReservationId,
        update: ReservationUpdate,
    ) -> Result<(), RepositoryError> {
        let mut reservations = self.reservations.write().await;
        let reservation = reservations
            .iter_mut()
            .find(|reservation| &reservation.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        update.apply(reservation);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRateRepository {
    rates: RwLock<RateTable>,
}

impl InMemoryRateRepository {
    pub fn with_rates(rates: RateTable) -> Self {
        Self { rates: RwLock::new(rates) }
    }
}

#[async_trait::async_trait]
impl RateRepository for InMemoryRateRepository {
    async fn list_rate_entries(&self) -> Result<RateTable, RepositoryError> {
        let rates = self.rates.read().await;
        Ok(rates.clone())
    }

    async fn save_rate(&self, entry: RateEntry) -> Result<(), RepositoryError> {
        let mut rates = self.rates.write().await;
        rates.insert(entry.category, entry.charge_per_day);
        Ok(())
    }
}
