//! The reservation desk: validation, pricing and persistence wired together.
//!
//! The desk owns no state of its own. Repositories are injected so the same flow runs against
//! SQLite or the in-memory stores.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use rentdesk_core::admin::{review_cards, ActionBinding, ReservationCard};
use rentdesk_core::config::BookingConfig;
use rentdesk_core::domain::rate::{RateEntry, RateTable};
use rentdesk_core::domain::reservation::{
    Reservation, ReservationId, ReservationStatus, ReservationUpdate,
};
use rentdesk_core::errors::{ApplicationError, ValidationError};
use rentdesk_core::rental::pricing::PricingResult;
use rentdesk_core::rental::request::{parse_date, parse_time, ReservationRequest};
use rentdesk_core::rental::{DeterministicReservationEngine, ReservationEngine, ValidationInput};

use crate::connection::DbPool;
use crate::repositories::{
    RateRepository, RepositoryError, ReservationRepository, SqlRateRepository,
    SqlReservationRepository,
};

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<DeskError> for ApplicationError {
    fn from(value: DeskError) -> Self {
        match value {
            DeskError::Validation(error) => Self::Validation(error),
            DeskError::Repository(RepositoryError::NotFound(id)) => Self::NotFound(id.0),
            DeskError::Repository(error) => Self::Persistence(error.to_string()),
        }
    }
}

/// What the booking form gets back after a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub reservation_id: ReservationId,
    pub driver_name: String,
    pub total_charge: Decimal,
    pub pricing: PricingResult,
}

impl SubmissionReceipt {
    pub fn message(&self) -> String {
        format!("Reservation made for {}.", self.driver_name)
    }
}

pub struct ReservationDesk {
    reservations: Arc<dyn ReservationRepository>,
    rates: Arc<dyn RateRepository>,
    engine: Arc<dyn ReservationEngine>,
}

impl ReservationDesk {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        rates: Arc<dyn RateRepository>,
        engine: Arc<dyn ReservationEngine>,
    ) -> Self {
        Self { reservations, rates, engine }
    }

    pub fn with_booking_config(
        reservations: Arc<dyn ReservationRepository>,
        rates: Arc<dyn RateRepository>,
        config: &BookingConfig,
    ) -> Self {
        let engine = DeterministicReservationEngine::from_config(config);
        Self::new(reservations, rates, Arc::new(engine))
    }

    /// Desk backed by the SQLite repositories sharing one pool.
    pub fn sqlite(pool: DbPool, config: &BookingConfig) -> Self {
        Self::with_booking_config(
            Arc::new(SqlReservationRepository::new(pool.clone())),
            Arc::new(SqlRateRepository::new(pool)),
            config,
        )
    }

    /// Validates, prices and stores one booking. Nothing is written unless every check passes.
    ///
    /// The overlap check and the insert are separate statements; two concurrent submissions for
    /// the same category can both pass.
    pub async fn submit(
        &self,
        request: &ReservationRequest,
        now: NaiveDateTime,
    ) -> Result<SubmissionReceipt, DeskError> {
        let existing = self.reservations.list_reservations().await?;
        let rates = self.rates.list_rate_entries().await?;

        let priced = match self.engine.validate_and_price(ValidationInput {
            request,
            existing: &existing,
            rates: &rates,
            now,
        }) {
            Ok(priced) => priced,
            Err(error) => {
                info!(
                    event_name = "rental.reservation.rejected",
                    reason = error.kind(),
                    error = %error,
                    "reservation request rejected"
                );
                return Err(error.into());
            }
        };

        let reservation_id = self.reservations.create_reservation(&priced).await?;
        info!(
            event_name = "rental.reservation.submitted",
            reservation_id = %reservation_id,
            category = priced.category.as_str(),
            rental_days = priced.pricing.rental_days,
            total_charge = %priced.total_charge,
            "reservation stored as pending"
        );

        Ok(SubmissionReceipt {
            reservation_id,
            driver_name: priced.driver_name,
            total_charge: priced.total_charge,
            pricing: priced.pricing,
        })
    }

    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, DeskError> {
        Ok(self.reservations.list_reservations().await?)
    }

    pub async fn review_cards(&self) -> Result<Vec<ReservationCard>, DeskError> {
        let reservations = self.reservations.list_reservations().await?;
        Ok(review_cards(&reservations))
    }

    /// Overwrites the status. Re-approving or flipping a decided booking is allowed but logged.
    pub async fn set_status(
        &self,
        id: &ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation, DeskError> {
        let mut reservation = self.require(id).await?;

        if !reservation.can_transition_to(status) {
            warn!(
                event_name = "rental.reservation.status_changed",
                reservation_id = %id,
                from = reservation.status.as_str(),
                to = status.as_str(),
                decided = reservation.status.is_terminal(),
                "status overwrite outside the booking lifecycle"
            );
        }

        let update = ReservationUpdate::Status(status);
        self.reservations.update_field(id, update.clone()).await?;
        let previous = reservation.status;
        update.apply(&mut reservation);

        info!(
            event_name = "rental.reservation.status_changed",
            reservation_id = %id,
            from = previous.as_str(),
            to = status.as_str(),
            "reservation status updated"
        );
        Ok(reservation)
    }

    pub async fn dispatch(&self, binding: &ActionBinding) -> Result<Reservation, DeskError> {
        self.set_status(&binding.reservation_id, binding.target_status()).await
    }

    /// Moves the return date. The time of day falls back to the booking's start time, and the
    /// stored total is left as it was priced at submission.
    pub async fn extend_return(
        &self,
        id: &ReservationId,
        return_date: &str,
        return_time: Option<&str>,
    ) -> Result<Reservation, DeskError> {
        let mut reservation = self.require(id).await?;

        let date = parse_date("return_date", return_date)?;
        let time = match return_time {
            Some(value) => parse_time(value)?,
            None => reservation.reservation_start.time(),
        };
        let return_at = date.and_time(time);

        if return_at < reservation.reservation_start {
            warn!(
                event_name = "rental.reservation.return_extended",
                reservation_id = %id,
                "new return date precedes the reservation start"
            );
        }

        let update = ReservationUpdate::ReturnAt(return_at);
        self.reservations.update_field(id, update.clone()).await?;
        update.apply(&mut reservation);

        info!(
            event_name = "rental.reservation.return_extended",
            reservation_id = %id,
            return_at = %return_at,
            "reservation return date updated"
        );
        Ok(reservation)
    }

    pub async fn list_rates(&self) -> Result<RateTable, DeskError> {
        Ok(self.rates.list_rate_entries().await?)
    }

    pub async fn save_rate(&self, entry: RateEntry) -> Result<(), DeskError> {
        let category = entry.category;
        let charge_per_day = entry.charge_per_day;
        self.rates.save_rate(entry).await?;
        info!(
            event_name = "rental.rates.saved",
            category = category.as_str(),
            charge_per_day = %charge_per_day,
            "daily rate saved"
        );
        Ok(())
    }

    async fn require(&self, id: &ReservationId) -> Result<Reservation, DeskError> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeskError::Repository(RepositoryError::NotFound(id.clone())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use rust_decimal::Decimal;

    use rentdesk_core::config::BookingConfig;
    use rentdesk_core::domain::category::CarCategory;
    use rentdesk_core::domain::rate::{RateEntry, RateTable};
    use rentdesk_core::domain::reservation::{ReservationId, ReservationStatus};
    use rentdesk_core::errors::{ApplicationError, ValidationError};
    use rentdesk_core::rental::request::ReservationRequest;

    use super::{DeskError, ReservationDesk};
    use crate::repositories::{
        InMemoryRateRepository, InMemoryReservationRepository, RepositoryError,
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2027, 5, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid fixture datetime")
    }

    fn sedan_rate(charge_per_day: Decimal) -> RateEntry {
        RateEntry { category: CarCategory::Sedan, charge_per_day }
    }

    fn desk() -> ReservationDesk {
        let rates: RateTable = [sedan_rate(Decimal::new(50, 0))].into_iter().collect();
        ReservationDesk::with_booking_config(
            Arc::new(InMemoryReservationRepository::default()),
            Arc::new(InMemoryRateRepository::with_rates(rates)),
            &BookingConfig::default(),
        )
    }

    fn request(name: &str, date: &str, return_date: &str) -> ReservationRequest {
        ReservationRequest {
            driver_name: name.to_string(),
            category: "Sedan".to_string(),
            start_date: date.to_string(),
            start_time: "14:15".to_string(),
            return_date: return_date.to_string(),
        }
    }

    #[tokio::test]
    async fn submit_stores_a_pending_priced_record() {
        let desk = desk();

        let receipt = desk
            .submit(&request("Grace Hopper", "05-10-2027", "05-12-2027"), now())
            .await
            .expect("accepted");

        assert_eq!(receipt.message(), "Reservation made for Grace Hopper.");
        assert_eq!(receipt.total_charge, Decimal::new(15000, 2));

        let listed = desk.list_reservations().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, receipt.reservation_id);
        assert_eq!(listed[0].status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn rejected_submission_writes_nothing() {
        let desk = desk();
        desk.submit(&request("A", "05-10-2027", "05-12-2027"), now()).await.expect("first");

        let error = desk
            .submit(&request("B", "05-12-2027", "05-14-2027"), now())
            .await
            .expect_err("same-category overlap");

        assert!(matches!(
            error,
            DeskError::Validation(ValidationError::CategoryUnavailable { .. })
        ));
        assert_eq!(desk.list_reservations().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn denied_then_approved_is_still_applied() {
        let desk = desk();
        let receipt =
            desk.submit(&request("C", "05-10-2027", "05-10-2027"), now()).await.expect("accepted");

        desk.set_status(&receipt.reservation_id, ReservationStatus::Denied).await.expect("deny");
        let approved = desk
            .set_status(&receipt.reservation_id, ReservationStatus::Approved)
            .await
            .expect("approve after deny");

        assert_eq!(approved.status, ReservationStatus::Approved);
        assert_eq!(approved.total_charge, Some(Decimal::new(5000, 2)));
    }

    #[tokio::test]
    async fn dispatching_a_card_action_targets_its_record() {
        let desk = desk();
        desk.submit(&request("D", "05-10-2027", "05-11-2027"), now()).await.expect("first");
        desk.submit(&request("E", "06-10-2027", "06-11-2027"), now()).await.expect("second");

        let cards = desk.review_cards().await.expect("cards");
        let deny_second = cards[1].actions[1].clone();
        desk.dispatch(&deny_second).await.expect("dispatch");

        let listed = desk.list_reservations().await.expect("list");
        assert_eq!(listed[0].status, ReservationStatus::Pending);
        assert_eq!(listed[1].status, ReservationStatus::Denied);
    }

    #[tokio::test]
    async fn extend_keeps_start_time_and_total() {
        let desk = desk();
        let receipt =
            desk.submit(&request("F", "05-10-2027", "05-11-2027"), now()).await.expect("accepted");

        let extended = desk
            .extend_return(&receipt.reservation_id, "05-20-2027", None)
            .await
            .expect("extend");

        assert_eq!(extended.return_at.time(), NaiveTime::from_hms_opt(14, 15, 0).expect("time"));
        assert_eq!(extended.return_at.date(), NaiveDate::from_ymd_opt(2027, 5, 20).expect("date"));
        assert_eq!(extended.total_charge, Some(Decimal::new(10000, 2)));

        let with_time = desk
            .extend_return(&receipt.reservation_id, "05-21-2027", Some("08:00"))
            .await
            .expect("extend with time");
        assert_eq!(with_time.return_at.time(), NaiveTime::from_hms_opt(8, 0, 0).expect("time"));
    }

    #[tokio::test]
    async fn unknown_ids_surface_not_found() {
        let desk = desk();
        let missing = ReservationId("missing".to_string());

        let error =
            desk.set_status(&missing, ReservationStatus::Approved).await.expect_err("unknown id");
        assert!(matches!(error, DeskError::Repository(RepositoryError::NotFound(_))));
        assert_eq!(ApplicationError::from(error), ApplicationError::NotFound("missing".into()));

        let error = desk.extend_return(&missing, "05-20-2027", None).await.expect_err("unknown");
        assert!(matches!(error, DeskError::Repository(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn saved_rates_price_later_submissions() {
        let desk = desk();
        desk.save_rate(sedan_rate(Decimal::new(100, 0))).await.expect("save");

        let receipt =
            desk.submit(&request("G", "05-10-2027", "05-16-2027"), now()).await.expect("accepted");

        assert_eq!(receipt.total_charge, Decimal::new(63000, 2));
        assert_eq!(desk.list_rates().await.expect("rates").len(), 1);
    }
}
