use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use rentdesk_core::domain::category::CarCategory;
use rentdesk_core::domain::rate::{RateEntry, RateTable};

use super::{RateRepository, RepositoryError};
use crate::DbPool;

pub struct SqlRateRepository {
    pool: DbPool,
}

impl SqlRateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<RateEntry, RepositoryError> {
    let car_type: String =
        row.try_get("car_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let charge_str: String =
        row.try_get("charge_per_day").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let category =
        CarCategory::from_str(&car_type).map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let charge_per_day = Decimal::from_str(&charge_str)
        .map_err(|e| RepositoryError::Decode(format!("charge_per_day `{charge_str}`: {e}")))?;

    Ok(RateEntry { category, charge_per_day })
}

#[async_trait::async_trait]
impl RateRepository for SqlRateRepository {
    async fn list_rate_entries(&self) -> Result<RateTable, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> =
            sqlx::query("SELECT car_type, charge_per_day FROM rate_entry ORDER BY car_type")
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_entry).collect::<Result<RateTable, _>>()
    }

    async fn save_rate(&self, entry: RateEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO rate_entry (car_type, charge_per_day, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(car_type) DO UPDATE SET
                 charge_per_day = excluded.charge_per_day,
                 updated_at = excluded.updated_at",
        )
        .bind(entry.category.as_str())
        .bind(entry.charge_per_day.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use rentdesk_core::domain::category::CarCategory;
    use rentdesk_core::domain::rate::RateEntry;

    use super::SqlRateRepository;
    use crate::repositories::RateRepository;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn entry(category: CarCategory, charge_per_day: Decimal) -> RateEntry {
        RateEntry { category, charge_per_day }
    }

    #[tokio::test]
    async fn empty_store_yields_empty_table() {
        let repo = SqlRateRepository::new(setup().await);
        let table = repo.list_rate_entries().await.expect("list");
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn save_rate_upserts_by_category() {
        let repo = SqlRateRepository::new(setup().await);

        repo.save_rate(entry(CarCategory::Van, Decimal::new(80, 0))).await.expect("save");
        repo.save_rate(entry(CarCategory::Van, Decimal::new(8250, 2))).await.expect("upsert");
        repo.save_rate(entry(CarCategory::Suv, Decimal::new(70, 0))).await.expect("save suv");

        let table = repo.list_rate_entries().await.expect("list");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(CarCategory::Van), Some(Decimal::new(8250, 2)));
        assert_eq!(table.get(CarCategory::Sedan), None);
    }
}
