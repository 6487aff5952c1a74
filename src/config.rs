//! Static lookup tables: crop catalog, credit sources, insurance, storage.
//!
//! Hosts may ship these as JSON assets; the engine treats them as
//! read-only for the lifetime of a session. `default_config()` carries
//! the stock balance values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::{CreditSource, CropKind};

/// Per-crop economics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCfg {
    /// Seed purchase cost in rupees.
    pub seed_cost: i64,
    pub growth_days: u32,
    /// Quintals at full crop health.
    pub expected_yield: f64,
    /// Mid-season reference price per quintal.
    pub base_price: i64,
}

/// Terms offered by one credit source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCfg {
    /// Annual rate in percent.
    pub interest_rate: f64,
    pub processing_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceCfg {
    pub base_cost: i64,
    pub coverage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageCfg {
    pub cost_per_day: i64,
    /// Fraction of stored stock at risk per day; scaled down by the
    /// daily spoilage rule.
    pub spoilage_risk: f64,
}

/// Complete static configuration consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub crops: HashMap<CropKind, CropCfg>,
    pub credit: HashMap<CreditSource, CreditCfg>,
    pub insurance: InsuranceCfg,
    pub storage: StorageCfg,
}

impl GameConfig {
    /// Stock balance values.
    #[must_use]
    pub fn default_config() -> Self {
        let crops = HashMap::from([
            (
                CropKind::Rice,
                CropCfg {
                    seed_cost: 2_000,
                    growth_days: 90,
                    expected_yield: 50.0,
                    base_price: 520,
                },
            ),
            (
                CropKind::Wheat,
                CropCfg {
                    seed_cost: 1_500,
                    growth_days: 120,
                    expected_yield: 40.0,
                    base_price: 480,
                },
            ),
            (
                CropKind::Vegetables,
                CropCfg {
                    seed_cost: 3_000,
                    growth_days: 60,
                    expected_yield: 30.0,
                    base_price: 800,
                },
            ),
            (
                CropKind::Cotton,
                CropCfg {
                    seed_cost: 2_500,
                    growth_days: 150,
                    expected_yield: 25.0,
                    base_price: 1_200,
                },
            ),
            (
                CropKind::Pulses,
                CropCfg {
                    seed_cost: 1_800,
                    growth_days: 90,
                    expected_yield: 20.0,
                    base_price: 900,
                },
            ),
            (
                CropKind::Other,
                CropCfg {
                    seed_cost: 2_000,
                    growth_days: 90,
                    expected_yield: 35.0,
                    base_price: 600,
                },
            ),
        ]);

        let credit = HashMap::from([
            (
                CreditSource::Bank,
                CreditCfg {
                    interest_rate: 8.0,
                    processing_days: 3,
                },
            ),
            (
                CreditSource::Moneylender,
                CreditCfg {
                    interest_rate: 25.0,
                    processing_days: 0,
                },
            ),
            (
                CreditSource::Cooperative,
                CreditCfg {
                    interest_rate: 6.0,
                    processing_days: 1,
                },
            ),
        ]);

        Self {
            crops,
            credit,
            insurance: InsuranceCfg {
                base_cost: 500,
                coverage_percent: 80.0,
            },
            storage: StorageCfg {
                cost_per_day: 50,
                spoilage_risk: 0.05,
            },
        }
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json_str: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the invariants the engine relies on. Credit sources may
    /// be omitted (loans from a missing source are rejected), but rice
    /// must exist because the day tick falls back to it when the planted
    /// crop is absent from the catalog.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if !self.crops.contains_key(&CropKind::Rice) {
            return Err(String::from("crop catalog must include rice"));
        }
        for (kind, cfg) in &self.crops {
            if cfg.seed_cost <= 0 || cfg.base_price <= 0 {
                return Err(format!("crop {kind} must have positive costs"));
            }
            if cfg.expected_yield <= 0.0 || !cfg.expected_yield.is_finite() {
                return Err(format!("crop {kind} must have a positive expected yield"));
            }
        }
        for (source, cfg) in &self.credit {
            if cfg.interest_rate < 0.0 || !cfg.interest_rate.is_finite() {
                return Err(format!("credit source {source} has an invalid rate"));
            }
        }
        if self.insurance.base_cost <= 0 {
            return Err(String::from("insurance base cost must be positive"));
        }
        if !(0.0..=100.0).contains(&self.insurance.coverage_percent) {
            return Err(String::from("insurance coverage must be within 0..=100"));
        }
        if !(0.0..=1.0).contains(&self.storage.spoilage_risk) {
            return Err(String::from("spoilage risk must be within 0..=1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn crop(&self, kind: CropKind) -> Option<&CropCfg> {
        self.crops.get(&kind)
    }

    /// Crop config with the original rice fallback for pricing paths
    /// that must always produce a price.
    ///
    /// # Panics
    ///
    /// Never panics for a validated config: rice is guaranteed present.
    #[must_use]
    pub fn crop_or_rice(&self, kind: CropKind) -> &CropCfg {
        self.crops
            .get(&kind)
            .or_else(|| self.crops.get(&CropKind::Rice))
            .expect("validated config always includes rice")
    }

    #[must_use]
    pub fn credit(&self, source: CreditSource) -> Option<&CreditCfg> {
        self.credit.get(&source)
    }
}
