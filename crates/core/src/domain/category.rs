use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label shown by the booking form before a vehicle class has been picked.
pub const UNSELECTED_CATEGORY: &str = "Select Car Type";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CarCategory {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    #[serde(rename = "Pick-up")]
    PickUp,
    Van,
}

impl CarCategory {
    pub const ALL: [CarCategory; 4] =
        [CarCategory::Sedan, CarCategory::Suv, CarCategory::PickUp, CarCategory::Van];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::PickUp => "Pick-up",
            Self::Van => "Van",
        }
    }

    /// Resolves a form selection. The placeholder label and unknown labels resolve to `None`.
    pub fn from_selection(selection: &str) -> Option<Self> {
        let trimmed = selection.trim();
        if trimmed.is_empty() || trimmed == UNSELECTED_CATEGORY {
            return None;
        }
        trimmed.parse().ok()
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown car category `{0}` (expected Sedan|SUV|Pick-up|Van)")]
pub struct UnknownCategory(pub String);

impl FromStr for CarCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sedan" => Ok(Self::Sedan),
            "suv" => Ok(Self::Suv),
            "pick-up" | "pickup" => Ok(Self::PickUp),
            "van" => Ok(Self::Van),
            _ => Err(UnknownCategory(value.to_string())),
        }
    }
}
