use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::CarCategory;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub category: CarCategory,
    pub charge_per_day: Decimal,
}

/// Category to per-day charge mapping as provisioned in the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    rates: BTreeMap<CarCategory, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: CarCategory, charge_per_day: Decimal) {
        self.rates.insert(category, charge_per_day);
    }

    pub fn get(&self, category: CarCategory) -> Option<Decimal> {
        self.rates.get(&category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = RateEntry> + '_ {
        self.rates.iter().map(|(category, charge_per_day)| RateEntry {
            category: *category,
            charge_per_day: *charge_per_day,
        })
    }
}

impl FromIterator<RateEntry> for RateTable {
    fn from_iter<I: IntoIterator<Item = RateEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry.category, entry.charge_per_day);
        }
        table
    }
}
