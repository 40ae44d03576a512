pub mod availability;
pub mod pricing;
pub mod rates;
pub mod request;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::BookingConfig;
use crate::domain::{
    category::CarCategory,
    rate::RateTable,
    reservation::{Reservation, ReservationStatus},
};
use crate::errors::ValidationError;

use self::{
    availability::{check_available, check_lead_time},
    pricing::{DailyRatePricingEngine, DiscountRule, PricingEngine, PricingResult},
    rates::{RateLookup, TableRateLookup},
    request::ReservationRequest,
};

#[derive(Clone, Debug)]
pub struct ValidationInput<'a> {
    pub request: &'a ReservationRequest,
    pub existing: &'a [Reservation],
    pub rates: &'a RateTable,
    pub now: NaiveDateTime,
}

/// An accepted booking ready to be handed to the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedReservation {
    pub driver_name: String,
    pub category: CarCategory,
    pub reservation_start: NaiveDateTime,
    pub return_at: NaiveDateTime,
    pub status: ReservationStatus,
    pub total_charge: Decimal,
    pub pricing: PricingResult,
}

pub trait ReservationEngine: Send + Sync {
    fn validate_and_price(
        &self,
        input: ValidationInput<'_>,
    ) -> Result<PricedReservation, ValidationError>;
}

pub struct DeterministicReservationEngine<L, P> {
    rate_lookup: L,
    pricing_engine: P,
    min_lead_time_hours: u32,
}

impl<L, P> DeterministicReservationEngine<L, P> {
    pub fn new(rate_lookup: L, pricing_engine: P, min_lead_time_hours: u32) -> Self {
        Self { rate_lookup, pricing_engine, min_lead_time_hours }
    }
}

impl DeterministicReservationEngine<TableRateLookup, DailyRatePricingEngine> {
    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(
            TableRateLookup::new(config.missing_rate),
            DailyRatePricingEngine::new(DiscountRule::from(config)),
            config.min_lead_time_hours,
        )
    }
}

impl Default for DeterministicReservationEngine<TableRateLookup, DailyRatePricingEngine> {
    fn default() -> Self {
        Self::from_config(&BookingConfig::default())
    }
}

impl<L, P> ReservationEngine for DeterministicReservationEngine<L, P>
where
    L: RateLookup,
    P: PricingEngine,
{
    fn validate_and_price(
        &self,
        input: ValidationInput<'_>,
    ) -> Result<PricedReservation, ValidationError> {
        let window = input.request.parse()?;
        check_lead_time(window.start, input.now, self.min_lead_time_hours)?;
        check_available(input.existing, window.category, window.start, window.end)?;

        let charge_per_day = self.rate_lookup.rate_for(input.rates, window.category)?;
        let pricing = self.pricing_engine.price(charge_per_day, window.start, window.end)?;

        Ok(PricedReservation {
            driver_name: window.driver_name,
            category: window.category,
            reservation_start: window.start,
            return_at: window.end,
            status: ReservationStatus::Pending,
            total_charge: pricing.total,
            pricing,
        })
    }
}
