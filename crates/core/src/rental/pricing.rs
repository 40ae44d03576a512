use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::BookingConfig;
use crate::errors::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub threshold_days: u32,
    pub discount_pct: u32,
}

impl Default for DiscountRule {
    fn default() -> Self {
        Self { threshold_days: 7, discount_pct: 10 }
    }
}

impl From<&BookingConfig> for DiscountRule {
    fn from(config: &BookingConfig) -> Self {
        Self { threshold_days: config.discount_threshold_days, discount_pct: config.discount_pct }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub charge_per_day: Decimal,
    pub rental_days: i64,
    pub subtotal: Decimal,
    pub discount_total: Decimal,
    pub total: Decimal,
    pub steps: Vec<PricingTraceStep>,
}

pub trait PricingEngine: Send + Sync {
    fn price(
        &self,
        charge_per_day: Decimal,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<PricingResult, ValidationError>;
}

#[derive(Default)]
pub struct DailyRatePricingEngine {
    rule: DiscountRule,
}

impl DailyRatePricingEngine {
    pub fn new(rule: DiscountRule) -> Self {
        Self { rule }
    }
}

impl PricingEngine for DailyRatePricingEngine {
    fn price(
        &self,
        charge_per_day: Decimal,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<PricingResult, ValidationError> {
        price_rental_with_trace(charge_per_day, rental_days(start, end), self.rule)
    }
}

/// Inclusive day count: whole days between the two instants plus one, so a same-day rental is
/// one day.
pub fn rental_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_days() + 1
}

pub fn price_rental(
    charge_per_day: Decimal,
    rental_days: i64,
    rule: DiscountRule,
) -> Result<Decimal, ValidationError> {
    price_rental_with_trace(charge_per_day, rental_days, rule).map(|result| result.total)
}

/// Fails with `ChargeOutOfRange` when the subtotal or discount does not fit in a `Decimal`.
pub fn price_rental_with_trace(
    charge_per_day: Decimal,
    rental_days: i64,
    rule: DiscountRule,
) -> Result<PricingResult, ValidationError> {
    let out_of_range = || ValidationError::ChargeOutOfRange { charge_per_day, rental_days };
    let subtotal =
        charge_per_day.checked_mul(Decimal::from(rental_days)).ok_or_else(out_of_range)?;
    let mut steps = vec![PricingTraceStep {
        stage: "subtotal".to_string(),
        detail: format!("{charge_per_day} per day x {rental_days} days"),
        amount: subtotal,
    }];

    let discount_total = if rental_days >= i64::from(rule.threshold_days) {
        let discount = subtotal
            .checked_mul(Decimal::from(rule.discount_pct))
            .ok_or_else(out_of_range)?
            / Decimal::ONE_HUNDRED;
        let discount = discount.round_dp(2);
        steps.push(PricingTraceStep {
            stage: "long_rental_discount".to_string(),
            detail: format!("{}% off at {} days or more", rule.discount_pct, rule.threshold_days),
            amount: -discount,
        });
        discount
    } else {
        Decimal::ZERO
    };

    let total = (subtotal - discount_total).round_dp(2);
    steps.push(PricingTraceStep {
        stage: "total".to_string(),
        detail: "subtotal - discount".to_string(),
        amount: total,
    });

    Ok(PricingResult { charge_per_day, rental_days, subtotal, discount_total, total, steps })
}
