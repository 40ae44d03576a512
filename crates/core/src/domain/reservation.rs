use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::CarCategory;

/// Rendering used by the admin listing, e.g. `03-14-2027 @ 10:00`.
pub const DISPLAY_FORMAT: &str = "%m-%d-%Y @ %H:%M";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub String);

impl ReservationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Approved,
    Denied,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Denied => "Denied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            "Denied" => Some(Self::Denied),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Denied)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub driver_name: String,
    pub category: CarCategory,
    pub reservation_start: NaiveDateTime,
    pub return_at: NaiveDateTime,
    pub status: ReservationStatus,
    pub total_charge: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Pending may become Approved or Denied. Decided bookings have no further transition.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self.status, next),
            (ReservationStatus::Pending, ReservationStatus::Approved)
                | (ReservationStatus::Pending, ReservationStatus::Denied)
        )
    }

    /// Inclusive-bound interval test against another booking window.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.reservation_start <= end && self.return_at >= start
    }
}

/// Single-field mutations the admin surface is allowed to perform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationUpdate {
    Status(ReservationStatus),
    ReturnAt(NaiveDateTime),
}

impl ReservationUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::ReturnAt(_) => "return_date",
        }
    }

    pub fn apply(&self, reservation: &mut Reservation) {
        match self {
            Self::Status(status) => reservation.status = *status,
            Self::ReturnAt(return_at) => reservation.return_at = *return_at,
        }
    }
}
