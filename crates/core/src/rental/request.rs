use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::category::CarCategory;
use crate::errors::ValidationError;

pub const DATE_FORMAT: &str = "%m-%d-%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// Raw booking form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub driver_name: String,
    pub category: String,
    pub start_date: String,
    pub start_time: String,
    pub return_date: String,
}

/// A request whose fields are present and parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    pub driver_name: String,
    pub category: CarCategory,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReservationRequest {
    pub fn check_complete(&self) -> Result<CarCategory, ValidationError> {
        let category = CarCategory::from_selection(&self.category);
        let mut missing = Vec::new();

        if self.driver_name.trim().is_empty() {
            missing.push("driver_name");
        }
        if category.is_none() {
            missing.push("category");
        }
        if self.start_date.trim().is_empty() {
            missing.push("start_date");
        }
        if self.start_time.trim().is_empty() {
            missing.push("start_time");
        }
        if self.return_date.trim().is_empty() {
            missing.push("return_date");
        }

        match category {
            Some(category) if missing.is_empty() => Ok(category),
            _ => Err(ValidationError::IncompleteFields { missing }),
        }
    }

    /// Completeness then format. The return reuses the start time-of-day; the form has no
    /// separate return time.
    pub fn parse(&self) -> Result<BookingWindow, ValidationError> {
        let category = self.check_complete()?;
        let time = parse_time(&self.start_time)?;
        let start = parse_date("start_date", &self.start_date)?.and_time(time);
        let end = parse_date("return_date", &self.return_date)?.and_time(time);

        if end < start {
            return Err(ValidationError::ReturnBeforeStart);
        }

        Ok(BookingWindow { driver_name: self.driver_name.trim().to_string(), category, start, end })
    }
}

/// `MM-DD-YYYY` with a four-digit year. Month and day may drop their leading zero.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        field,
        value: value.to_string(),
        expected: "MM-DD-YYYY",
    };
    let text = value.trim();

    if !has_date_shape(text) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())
}

// chrono's `%Y` takes any number of digits and a sign, so the shape is checked first.
fn has_date_shape(text: &str) -> bool {
    let digits = |part: &str, lengths: &[usize]| {
        lengths.contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
    };
    let parts: Vec<&str> = text.split('-').collect();

    matches!(
        parts.as_slice(),
        [month, day, year] if digits(month, &[1, 2]) && digits(day, &[1, 2]) && digits(year, &[4])
    )
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "start_time",
            value: value.to_string(),
            expected: "HH:MM",
        }
    })
}
