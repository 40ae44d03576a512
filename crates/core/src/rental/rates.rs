use rust_decimal::Decimal;

use crate::config::MissingRatePolicy;
use crate::domain::{category::CarCategory, rate::RateTable};
use crate::errors::ValidationError;

pub trait RateLookup: Send + Sync {
    fn rate_for(&self, rates: &RateTable, category: CarCategory)
        -> Result<Decimal, ValidationError>;
}

#[derive(Clone, Copy, Debug)]
pub struct TableRateLookup {
    missing_rate: MissingRatePolicy,
}

impl TableRateLookup {
    pub fn new(missing_rate: MissingRatePolicy) -> Self {
        Self { missing_rate }
    }
}

impl Default for TableRateLookup {
    fn default() -> Self {
        Self::new(MissingRatePolicy::Zero)
    }
}

impl RateLookup for TableRateLookup {
    fn rate_for(
        &self,
        rates: &RateTable,
        category: CarCategory,
    ) -> Result<Decimal, ValidationError> {
        match (rates.get(category), self.missing_rate) {
            (Some(rate), _) => Ok(rate),
            (None, MissingRatePolicy::Zero) => Ok(get_rate(rates, category)),
            (None, MissingRatePolicy::Reject) => {
                Err(ValidationError::RateNotConfigured { category })
            }
        }
    }
}

/// Per-day charge for `category`, zero when the table has no entry.
pub fn get_rate(rates: &RateTable, category: CarCategory) -> Decimal {
    rates.get(category).unwrap_or(Decimal::ZERO)
}
