//! Garage configuration: CLI arguments layered over an optional YAML file
//! over built-in defaults.
//!
//! The defaults reproduce the classic small-garage demo pool: spots 1-3 for
//! cars, spot 4 for motorcycles, with the standard tariff table.

use crate::error::GarageError;
use crate::logging::LogFormat;
use crate::model::{Spot, SpotId, VehicleCategory};
use crate::registry::SpotRegistry;
use crate::tariff::{
    DEFAULT_CAR_RATE, DEFAULT_FALLBACK_RATE, DEFAULT_MOTORCYCLE_RATE, TariffTable,
};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "carpark", about = "Parking spot allocation and billing console")]
pub struct CliArgs {
    /// Path to a YAML garage configuration file.
    #[arg(long, env = "CARPARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, env = "CARPARK_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// One spot in the configured pool.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotSpec {
    pub id: u32,
    pub category: VehicleCategory,
}

/// Shape of the YAML config file. Every field is optional; missing fields
/// fall back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    spots: Option<Vec<SpotSpec>>,
    tariffs: Option<HashMap<VehicleCategory, f64>>,
    default_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct GarageConfig {
    pub spots: Vec<SpotSpec>,
    pub tariffs: HashMap<VehicleCategory, f64>,
    pub default_rate: f64,
}

impl Default for GarageConfig {
    fn default() -> Self {
        let spots = (1..=3)
            .map(|id| SpotSpec {
                id,
                category: VehicleCategory::Car,
            })
            .chain(std::iter::once(SpotSpec {
                id: 4,
                category: VehicleCategory::Motorcycle,
            }))
            .collect();

        let mut rates = HashMap::new();
        rates.insert(VehicleCategory::Car, DEFAULT_CAR_RATE);
        rates.insert(VehicleCategory::Motorcycle, DEFAULT_MOTORCYCLE_RATE);

        Self {
            spots,
            tariffs: rates,
            default_rate: DEFAULT_FALLBACK_RATE,
        }
    }
}

impl GarageConfig {
    /// Loads configuration, layering the file (if any) over defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_config = match path {
            Some(path) => load_config_file(path)?,
            None => FileConfig::default(),
        };

        let defaults = Self::default();
        let config = Self {
            spots: file_config.spots.unwrap_or(defaults.spots),
            tariffs: file_config.tariffs.unwrap_or(defaults.tariffs),
            default_rate: file_config.default_rate.unwrap_or(defaults.default_rate),
        };

        config.validate()?;
        Ok(config)
    }

    /// Startup validation: at least one spot, positive unique ids, sane
    /// rates. Fail-fast; a garage with a broken layout should not open.
    pub fn validate(&self) -> std::result::Result<(), GarageError> {
        if self.spots.is_empty() {
            return Err(GarageError::Config(
                "at least one spot must be configured".into(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.spots {
            if spec.id == 0 {
                return Err(GarageError::Config("spot id must be positive".into()));
            }
            if !seen.insert(spec.id) {
                return Err(GarageError::Config(format!(
                    "duplicate spot id {}",
                    spec.id
                )));
            }
        }

        for (category, rate) in &self.tariffs {
            if !rate.is_finite() || *rate < 0.0 {
                return Err(GarageError::Config(format!(
                    "tariff for {category} must be a non-negative number"
                )));
            }
        }
        if !self.default_rate.is_finite() || self.default_rate < 0.0 {
            return Err(GarageError::Config(
                "default rate must be a non-negative number".into(),
            ));
        }

        Ok(())
    }

    /// Builds the spot registry from the configured pool, in file order.
    pub fn build_registry(&self) -> std::result::Result<SpotRegistry, GarageError> {
        let mut registry = SpotRegistry::new();
        for spec in &self.spots {
            let id = SpotId::new(spec.id)?;
            registry.add(Spot::new(id, spec.category.clone()));
        }
        Ok(registry)
    }

    pub fn build_tariffs(&self) -> TariffTable {
        TariffTable::new(self.tariffs.clone(), self.default_rate)
    }
}

fn load_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
