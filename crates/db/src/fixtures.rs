use chrono::Utc;
use rust_decimal::Decimal;

use rentdesk_core::domain::category::CarCategory;
use rentdesk_core::domain::rate::{RateEntry, RateTable};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Daily charges provisioned by `rentdesk seed`, in whole currency units.
const DEFAULT_RATES: &[(CarCategory, i64)] = &[
    (CarCategory::Sedan, 50),
    (CarCategory::Suv, 70),
    (CarCategory::PickUp, 65),
    (CarCategory::Van, 80),
];

/// Default rate table for a fresh desk.
///
/// Loading never overwrites a rate an operator already set, so reseeding is safe.
pub struct DefaultRateSeed;

impl DefaultRateSeed {
    pub fn table() -> RateTable {
        DEFAULT_RATES
            .iter()
            .map(|(category, amount)| RateEntry {
                category: *category,
                charge_per_day: Decimal::new(*amount, 0),
            })
            .collect()
    }

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        let seeded_at = Utc::now().to_rfc3339();
        let mut rates_seeded = Vec::new();

        for (category, amount) in DEFAULT_RATES {
            let result = sqlx::query(
                "INSERT INTO rate_entry (car_type, charge_per_day, updated_at)
                 VALUES (?, ?, ?)
                 ON CONFLICT(car_type) DO NOTHING",
            )
            .bind(category.as_str())
            .bind(Decimal::new(*amount, 0).to_string())
            .bind(&seeded_at)
            .execute(&mut *tx)
            .await?;

            rates_seeded.push(RateSeedInfo {
                category: *category,
                charge_per_day: Decimal::new(*amount, 0),
                inserted: result.rows_affected() == 1,
            });
        }

        tx.commit().await?;
        Ok(SeedResult { rates_seeded })
    }

    /// Checks that every category has a stored rate.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for (category, _) in DEFAULT_RATES {
            let present: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rate_entry WHERE car_type = ?1)")
                    .bind(category.as_str())
                    .fetch_one(pool)
                    .await?;
            checks.push((category.as_str(), present == 1));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }

    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM rate_entry").execute(pool).await?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub rates_seeded: Vec<RateSeedInfo>,
}

impl SeedResult {
    pub fn inserted_count(&self) -> usize {
        self.rates_seeded.iter().filter(|info| info.inserted).count()
    }
}

#[derive(Debug)]
pub struct RateSeedInfo {
    pub category: CarCategory,
    pub charge_per_day: Decimal,
    pub inserted: bool,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
