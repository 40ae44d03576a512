use chrono::{Duration, NaiveDateTime};

use crate::domain::{category::CarCategory, reservation::Reservation};
use crate::errors::ValidationError;

pub fn check_lead_time(
    start: NaiveDateTime,
    now: NaiveDateTime,
    min_lead_time_hours: u32,
) -> Result<(), ValidationError> {
    if start - now < Duration::hours(i64::from(min_lead_time_hours)) {
        return Err(ValidationError::InsufficientLeadTime { required_hours: min_lead_time_hours });
    }
    Ok(())
}

/// First reservation of `category` whose window intersects `[start, end]`.
pub fn find_conflict<'a>(
    existing: &'a [Reservation],
    category: CarCategory,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Option<&'a Reservation> {
    existing
        .iter()
        .filter(|reservation| reservation.category == category)
        .find(|reservation| reservation.overlaps(start, end))
}

pub fn check_available(
    existing: &[Reservation],
    category: CarCategory,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<(), ValidationError> {
    match find_conflict(existing, category, start, end) {
        Some(conflict) => {
            Err(ValidationError::CategoryUnavailable { category, conflicting: conflict.id.clone() })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

    use crate::domain::{
        category::CarCategory,
        reservation::{Reservation, ReservationId, ReservationStatus},
    };
    use crate::errors::ValidationError;

    use super::{check_available, check_lead_time};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2027, 5, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid fixture datetime")
    }

    fn booked(
        id: &str,
        category: CarCategory,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Reservation {
        Reservation {
            id: ReservationId(id.to_string()),
            driver_name: "Existing Driver".to_string(),
            category,
            reservation_start: start,
            return_at: end,
            status: ReservationStatus::Pending,
            total_charge: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn exactly_twenty_four_hours_ahead_is_accepted() {
        let now = at(1, 9);
        assert_eq!(check_lead_time(now + Duration::hours(24), now, 24), Ok(()));
    }

    #[test]
    fn one_minute_short_of_lead_time_is_rejected() {
        let now = at(1, 9);
        let start = now + Duration::hours(24) - Duration::minutes(1);
        assert_eq!(
            check_lead_time(start, now, 24),
            Err(ValidationError::InsufficientLeadTime { required_hours: 24 })
        );
    }

    #[test]
    fn start_in_the_past_is_rejected() {
        let now = at(10, 9);
        assert!(check_lead_time(at(2, 9), now, 24).is_err());
    }

    #[test]
    fn overlapping_same_category_booking_is_a_conflict() {
        let existing = vec![booked("R-1", CarCategory::Suv, at(10, 10), at(14, 10))];

        assert_eq!(
            check_available(&existing, CarCategory::Suv, at(12, 10), at(16, 10)),
            Err(ValidationError::CategoryUnavailable {
                category: CarCategory::Suv,
                conflicting: ReservationId("R-1".to_string()),
            })
        );
    }

    #[test]
    fn touching_endpoints_count_as_overlap() {
        let existing = vec![booked("R-1", CarCategory::Van, at(10, 10), at(14, 10))];
        assert!(check_available(&existing, CarCategory::Van, at(14, 10), at(15, 10)).is_err());
    }

    #[test]
    fn containing_window_is_a_conflict() {
        let existing = vec![booked("R-1", CarCategory::Van, at(10, 10), at(11, 10))];
        assert!(check_available(&existing, CarCategory::Van, at(5, 10), at(20, 10)).is_err());
    }

    #[test]
    fn later_existing_booking_that_does_not_overlap_is_fine() {
        let existing = vec![booked("R-1", CarCategory::Sedan, at(20, 10), at(22, 10))];
        assert_eq!(check_available(&existing, CarCategory::Sedan, at(10, 10), at(12, 10)), Ok(()));
    }

    #[test]
    fn other_categories_never_conflict() {
        let existing = vec![booked("R-1", CarCategory::PickUp, at(10, 10), at(14, 10))];
        assert_eq!(check_available(&existing, CarCategory::Sedan, at(10, 10), at(14, 10)), Ok(()));
    }
}
