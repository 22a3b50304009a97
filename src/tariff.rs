//! Per-category hourly rates with a default for unlisted categories.

use crate::model::VehicleCategory;
use std::collections::HashMap;

pub const DEFAULT_CAR_RATE: f64 = 2.50;
pub const DEFAULT_MOTORCYCLE_RATE: f64 = 1.50;
pub const DEFAULT_FALLBACK_RATE: f64 = 2.00;

#[derive(Debug, Clone)]
pub struct TariffTable {
    rates: HashMap<VehicleCategory, f64>,
    default_rate: f64,
}

impl TariffTable {
    pub fn new(rates: HashMap<VehicleCategory, f64>, default_rate: f64) -> Self {
        Self {
            rates,
            default_rate,
        }
    }

    /// Hourly rate for a category, falling back to the default rate when
    /// the category has no entry.
    pub fn rate_for(&self, category: &VehicleCategory) -> f64 {
        self.rates
            .get(category)
            .copied()
            .unwrap_or(self.default_rate)
    }

    pub fn default_rate(&self) -> f64 {
        self.default_rate
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        let mut rates = HashMap::new();
        rates.insert(VehicleCategory::Car, DEFAULT_CAR_RATE);
        rates.insert(VehicleCategory::Motorcycle, DEFAULT_MOTORCYCLE_RATE);
        Self::new(rates, DEFAULT_FALLBACK_RATE)
    }
}
