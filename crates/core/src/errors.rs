use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{category::CarCategory, reservation::ReservationId};

/// Reasons a submitted booking is turned away. The first failing check wins.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .missing.join(", "))]
    IncompleteFields { missing: Vec<&'static str> },
    #[error("invalid {field} `{value}` (expected {expected})")]
    InvalidFormat { field: &'static str, value: String, expected: &'static str },
    #[error("return date is before the reservation start")]
    ReturnBeforeStart,
    #[error("reservation must start at least {required_hours} hours from now")]
    InsufficientLeadTime { required_hours: u32 },
    #[error("{category} is unavailable for the requested dates (conflicts with {conflicting})")]
    CategoryUnavailable { category: CarCategory, conflicting: ReservationId },
    #[error("no daily rate configured for {category}")]
    RateNotConfigured { category: CarCategory },
    #[error("charge of {charge_per_day} per day over {rental_days} days is out of range")]
    ChargeOutOfRange { charge_per_day: Decimal, rental_days: i64 },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("reservation not found: {0}")]
    NotFound(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: &'static str, detail: String },
    #[error("conflict: {message}")]
    Conflict { message: &'static str, detail: String },
    #[error("not found: {detail}")]
    NotFound { detail: String },
    #[error("service unavailable: {detail}")]
    ServiceUnavailable { detail: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl ValidationError {
    /// Text shown to the person filling in the booking form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::IncompleteFields { .. } => "Please fill in all fields.",
            Self::InvalidFormat { .. } => "Invalid date/time format.",
            Self::ReturnBeforeStart => "Return date must not be before the reservation date.",
            Self::InsufficientLeadTime { .. } => {
                "Reservations must be made at least 24 hours in advance."
            }
            Self::CategoryUnavailable { .. } => {
                "The selected car type is already reserved for those dates."
            }
            Self::RateNotConfigured { .. } => {
                "The selected car type has no daily rate configured yet."
            }
            Self::ChargeOutOfRange { .. } => "The rental charge is too large to compute.",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncompleteFields { .. } => "incomplete_fields",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::ReturnBeforeStart => "return_before_start",
            Self::InsufficientLeadTime { .. } => "insufficient_lead_time",
            Self::CategoryUnavailable { .. } => "category_unavailable",
            Self::RateNotConfigured { .. } => "rate_not_configured",
            Self::ChargeOutOfRange { .. } => "charge_out_of_range",
        }
    }
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { message, .. } | Self::Conflict { message, .. } => *message,
            Self::NotFound { .. } => "The requested reservation does not exist.",
            Self::ServiceUnavailable { .. } => {
                "The reservation store is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Validation(error @ ValidationError::CategoryUnavailable { .. }) => {
                Self::Conflict { message: error.user_message(), detail: error.to_string() }
            }
            ApplicationError::Validation(error) => {
                Self::BadRequest { message: error.user_message(), detail: error.to_string() }
            }
            ApplicationError::NotFound(detail) => Self::NotFound { detail },
            ApplicationError::Persistence(detail) => Self::ServiceUnavailable { detail },
            ApplicationError::Configuration(detail) => Self::Internal { detail },
        }
    }
}
