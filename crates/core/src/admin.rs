//! Admin review surface: one card per reservation plus the actions that can be dispatched on it.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::reservation::{Reservation, ReservationId, ReservationStatus, DISPLAY_FORMAT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Approve,
    Deny,
}

impl AdminAction {
    pub const ALL: [AdminAction; 2] = [AdminAction::Approve, AdminAction::Deny];

    pub fn target_status(&self) -> ReservationStatus {
        match self {
            Self::Approve => ReservationStatus::Approved,
            Self::Deny => ReservationStatus::Denied,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Deny => "Deny",
        }
    }
}

impl FromStr for AdminAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "deny" => Ok(Self::Deny),
            other => Err(format!("unknown admin action `{other}` (expected approve|deny)")),
        }
    }
}

/// An action bound to the record it targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub reservation_id: ReservationId,
    pub action: AdminAction,
}

impl ActionBinding {
    pub fn target_status(&self) -> ReservationStatus {
        self.action.target_status()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCard {
    pub reservation_id: ReservationId,
    pub details: String,
    pub total_charge: Option<Decimal>,
    pub actions: Vec<ActionBinding>,
}

impl ReservationCard {
    pub fn from_reservation(reservation: &Reservation) -> Self {
        let actions = AdminAction::ALL
            .iter()
            .map(|action| ActionBinding {
                reservation_id: reservation.id.clone(),
                action: *action,
            })
            .collect();

        Self {
            reservation_id: reservation.id.clone(),
            details: render_details(reservation),
            total_charge: reservation.total_charge,
            actions,
        }
    }
}

pub fn render_details(reservation: &Reservation) -> String {
    format!(
        "Name: {}\nCar Type: {}\nReservation Date: {}\nReturn Date: {}\nStatus: {}",
        reservation.driver_name,
        reservation.category,
        reservation.reservation_start.format(DISPLAY_FORMAT),
        reservation.return_at.format(DISPLAY_FORMAT),
        reservation.status,
    )
}

pub fn review_cards(reservations: &[Reservation]) -> Vec<ReservationCard> {
    reservations.iter().map(ReservationCard::from_reservation).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use crate::domain::{
        category::CarCategory,
        reservation::{Reservation, ReservationId, ReservationStatus},
    };

    use super::{review_cards, AdminAction};

    fn reservation(id: &str) -> Reservation {
        let date = NaiveDate::from_ymd_opt(2027, 3, 14).expect("date");
        Reservation {
            id: ReservationId(id.to_string()),
            driver_name: "Katherine Johnson".to_string(),
            category: CarCategory::PickUp,
            reservation_start: date.and_hms_opt(9, 5, 0).expect("time"),
            return_at: date.succ_opt().and_then(|d| d.and_hms_opt(9, 5, 0)).expect("time"),
            status: ReservationStatus::Pending,
            total_charge: Some(Decimal::new(13000, 2)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn card_renders_listing_text() {
        let cards = review_cards(&[reservation("R-1")]);

        assert_eq!(
            cards[0].details,
            "Name: Katherine Johnson\nCar Type: Pick-up\nReservation Date: 03-14-2027 @ 09:05\n\
             Return Date: 03-15-2027 @ 09:05\nStatus: Pending"
        );
    }

    #[test]
    fn each_card_binds_actions_to_its_own_record() {
        let cards = review_cards(&[reservation("R-1"), reservation("R-2")]);

        for card in &cards {
            assert_eq!(card.actions.len(), 2);
            assert!(card
                .actions
                .iter()
                .all(|binding| binding.reservation_id == card.reservation_id));
        }
        assert_eq!(cards[1].actions[1].target_status(), ReservationStatus::Denied);
    }

    #[test]
    fn actions_parse_case_insensitively() {
        assert_eq!("APPROVE".parse::<AdminAction>(), Ok(AdminAction::Approve));
        assert!("cancel".parse::<AdminAction>().is_err());
    }
}
