use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use rentdesk_core::domain::category::CarCategory;
use rentdesk_core::domain::reservation::{
    Reservation, ReservationId, ReservationStatus, ReservationUpdate,
};
use rentdesk_core::rental::PricedReservation;

use super::{RepositoryError, ReservationRepository, STORED_DATETIME_FORMAT};
use crate::DbPool;

pub struct SqlReservationRepository {
    pool: DbPool,
}

impl SqlReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode<T, E: ToString>(result: Result<T, E>) -> Result<T, RepositoryError> {
    result.map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn parse_stored_datetime(column: &str, value: &str) -> Result<NaiveDateTime, RepositoryError> {
    NaiveDateTime::parse_from_str(value, STORED_DATETIME_FORMAT)
        .map_err(|e| RepositoryError::Decode(format!("{column}: {e}")))
}

fn row_to_reservation(row: &sqlx::sqlite::SqliteRow) -> Result<Reservation, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let driver_name: String = decode(row.try_get("driver_name"))?;
    let car_type: String = decode(row.try_get("car_type"))?;
    let reservation_date: String = decode(row.try_get("reservation_date"))?;
    let return_date: String = decode(row.try_get("return_date"))?;
    let status_str: String = decode(row.try_get("status"))?;
    let total_charge_str: Option<String> = decode(row.try_get("total_charge"))?;
    let created_at_str: String = decode(row.try_get("created_at"))?;

    let status = ReservationStatus::parse(&status_str)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown status `{status_str}`")))?;
    let total_charge = total_charge_str.as_deref().map(Decimal::from_str).transpose();
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("created_at: {e}")))?;

    Ok(Reservation {
        id: ReservationId(id),
        driver_name,
        category: decode(CarCategory::from_str(&car_type))?,
        reservation_start: parse_stored_datetime("reservation_date", &reservation_date)?,
        return_at: parse_stored_datetime("return_date", &return_date)?,
        status,
        total_charge: decode(total_charge)?,
        created_at,
    })
}

#[async_trait::async_trait]
impl ReservationRepository for SqlReservationRepository {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, driver_name, car_type, reservation_date, return_date, status,
                    total_charge, created_at
             FROM reservation ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_reservation).collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<Reservation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, driver_name, car_type, reservation_date, return_date, status,
                    total_charge, created_at
             FROM reservation WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_reservation(r)?)),
            None => Ok(None),
        }
    }

    async fn create_reservation(
        &self,
        record: &PricedReservation,
    ) -> Result<ReservationId, RepositoryError> {
        let id = ReservationId::generate();

        sqlx::query(
            "INSERT INTO reservation (id, driver_name, car_type, reservation_date, return_date,
                                      status, total_charge, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id.0)
        .bind(&record.driver_name)
        .bind(record.category.as_str())
        .bind(record.reservation_start.format(STORED_DATETIME_FORMAT).to_string())
        .bind(record.return_at.format(STORED_DATETIME_FORMAT).to_string())
        .bind(record.status.as_str())
        .bind(record.total_charge.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_field(
        &self,
        id: &ReservationId,
        update: ReservationUpdate,
    ) -> Result<(), RepositoryError> {
        let result = match update {
            ReservationUpdate::Status(status) => {
                sqlx::query("UPDATE reservation SET status = ? WHERE id = ?")
                    .bind(status.as_str())
                    .bind(&id.0)
                    .execute(&self.pool)
                    .await?
            }
            ReservationUpdate::ReturnAt(return_at) => {
                sqlx::query("UPDATE reservation SET return_date = ? WHERE id = ?")
                    .bind(return_at.format(STORED_DATETIME_FORMAT).to_string())
                    .bind(&id.0)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.clone()));
        }

        Ok(())
    }
}
