//! Farm operations: sowing, fertilizer, insurance, and the harvest.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::{
    CROP_HEALTH_MAX, FERTILIZER_COST, FERTILIZER_HEALTH_BONUS, FERTILIZER_YIELD_MULTIPLIER,
    GROWTH_MAX_PERCENT,
};
use crate::error::EngineError;
use crate::numbers::round_to_tenth;
use crate::state::{CropKind, ExpenseKind, GameState, SeasonStage};

/// Result of a seed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SowOutcome {
    pub crop: CropKind,
    pub seed_cost: i64,
    pub expected_harvest: f64,
}

/// Buy and sow seeds for a crop in the catalog.
///
/// Sowing resets health and growth for the new planting. An existing
/// insurance policy carries over to the new crop.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCrop`] for a crop missing from the
/// catalog and [`EngineError::InsufficientFunds`] when cash cannot
/// cover the seed cost.
pub fn buy_seeds(
    state: &GameState,
    cfg: &GameConfig,
    crop: CropKind,
) -> Result<(GameState, SowOutcome), EngineError> {
    let crop_cfg = cfg.crop(crop).ok_or(EngineError::InvalidCrop)?;
    if state.wallet.cash < crop_cfg.seed_cost {
        return Err(EngineError::InsufficientFunds);
    }

    let mut next = state.clone();
    next.wallet.cash -= crop_cfg.seed_cost;
    next.farm.crop = crop;
    next.farm.crop_stage = 0;
    next.farm.crop_health = 100.0;
    next.farm.growth_percent = 0.0;
    next.farm.expected_harvest = crop_cfg.expected_yield;
    next.record_expense(ExpenseKind::Seeds, crop_cfg.seed_cost);

    let outcome = SowOutcome {
        crop,
        seed_cost: crop_cfg.seed_cost,
        expected_harvest: crop_cfg.expected_yield,
    };
    Ok((next, outcome))
}

/// Result of applying fertilizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerOutcome {
    pub cost: i64,
    pub crop_health: f64,
    pub expected_harvest: f64,
}

/// Apply fertilizer: fixed cost, +15 crop health, 10% yield uplift.
/// Allowed at any stage; repeat applications keep compounding the yield.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientFunds`] when cash cannot cover
/// the fertilizer cost.
pub fn apply_fertilizer(state: &GameState) -> Result<(GameState, FertilizerOutcome), EngineError> {
    if state.wallet.cash < FERTILIZER_COST {
        return Err(EngineError::InsufficientFunds);
    }

    let mut next = state.clone();
    next.wallet.cash -= FERTILIZER_COST;
    next.farm.adjust_health(FERTILIZER_HEALTH_BONUS);
    next.farm.expected_harvest = round_to_tenth(next.farm.expected_harvest * FERTILIZER_YIELD_MULTIPLIER);
    next.record_expense(ExpenseKind::Fertilizer, FERTILIZER_COST);

    let outcome = FertilizerOutcome {
        cost: FERTILIZER_COST,
        crop_health: next.farm.crop_health,
        expected_harvest: next.farm.expected_harvest,
    };
    Ok((next, outcome))
}

/// Result of buying crop insurance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceOutcome {
    pub cost: i64,
    pub coverage_percent: f64,
}

/// Buy crop insurance for the current planting.
///
/// # Errors
///
/// Returns [`EngineError::AlreadyInsured`] when a policy is already in
/// force and [`EngineError::InsufficientFunds`] when cash cannot cover
/// the premium.
pub fn buy_insurance(
    state: &GameState,
    cfg: &GameConfig,
) -> Result<(GameState, InsuranceOutcome), EngineError> {
    if state.farm.insured {
        return Err(EngineError::AlreadyInsured);
    }
    let cost = cfg.insurance.base_cost;
    if state.wallet.cash < cost {
        return Err(EngineError::InsufficientFunds);
    }

    let mut next = state.clone();
    next.wallet.cash -= cost;
    next.farm.insured = true;
    next.farm.insurance_cost = cost;
    next.farm.insurance_coverage = cfg.insurance.coverage_percent;
    next.record_expense(ExpenseKind::Insurance, cost);

    let outcome = InsuranceOutcome {
        cost,
        coverage_percent: cfg.insurance.coverage_percent,
    };
    Ok((next, outcome))
}

/// Realized yield in quintals: expected harvest scaled by crop health,
/// rounded to a tenth of a quintal.
#[must_use]
pub fn harvest_yield(expected_harvest: f64, crop_health: f64) -> f64 {
    round_to_tenth(expected_harvest * crop_health / CROP_HEALTH_MAX)
}

/// Result of bringing in the harvest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestOutcome {
    pub crop: CropKind,
    pub quantity: f64,
    pub crop_health: f64,
}

/// Bring in the crop during the harvest stage. The realized quantity
/// becomes the fresh harvest pool and the planting is marked mature.
///
/// # Errors
///
/// Returns [`EngineError::NotHarvestSeason`] outside the harvest stage.
pub fn harvest(state: &GameState) -> Result<(GameState, HarvestOutcome), EngineError> {
    if state.season_stage != SeasonStage::Harvest {
        return Err(EngineError::NotHarvestSeason);
    }

    let mut next = state.clone();
    let quantity = harvest_yield(next.farm.expected_harvest, next.farm.crop_health);
    next.market.harvest_quantity = quantity;
    next.farm.growth_percent = GROWTH_MAX_PERCENT;
    next.farm.crop_stage = 3;

    let outcome = HarvestOutcome {
        crop: next.farm.crop,
        quantity,
        crop_health: next.farm.crop_health,
    };
    Ok((next, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GameConfig {
        GameConfig::default_config()
    }

    #[test]
    fn sowing_resets_planting_but_keeps_insurance() {
        let mut state = GameState::default();
        state.farm.insured = true;
        state.farm.crop_health = 40.0;
        state.farm.growth_percent = 80.0;

        let (next, outcome) = buy_seeds(&state, &cfg(), CropKind::Wheat).unwrap();
        assert_eq!(outcome.seed_cost, 1_500);
        assert_eq!(next.wallet.cash, 8_500);
        assert_eq!(next.farm.crop, CropKind::Wheat);
        assert!((next.farm.crop_health - 100.0).abs() < f64::EPSILON);
        assert!((next.farm.growth_percent - 0.0).abs() < f64::EPSILON);
        assert!((next.farm.expected_harvest - 40.0).abs() < f64::EPSILON);
        assert!(next.farm.insured);
        assert_eq!(next.expenses.last().map(|e| e.kind), Some(ExpenseKind::Seeds));
    }

    #[test]
    fn sowing_rejects_when_broke() {
        let mut state = GameState::default();
        state.wallet.cash = 100;
        assert_eq!(
            buy_seeds(&state, &cfg(), CropKind::Rice).unwrap_err(),
            EngineError::InsufficientFunds
        );
    }

    #[test]
    fn fertilizer_boosts_health_and_yield() {
        let mut state = GameState::default();
        state.farm.crop_health = 70.0;
        state.farm.expected_harvest = 50.0;

        let (next, outcome) = apply_fertilizer(&state).unwrap();
        assert_eq!(next.wallet.cash, 8_500);
        assert!((outcome.crop_health - 85.0).abs() < f64::EPSILON);
        assert!((outcome.expected_harvest - 55.0).abs() < f64::EPSILON);

        // Health clamps at 100 on a second application.
        let (again, outcome) = apply_fertilizer(&next).unwrap();
        assert!((outcome.crop_health - 100.0).abs() < f64::EPSILON);
        assert!((again.farm.expected_harvest - 60.5).abs() < f64::EPSILON);
    }

    #[test]
    fn insurance_is_single_purchase() {
        let state = GameState::default();
        let (next, outcome) = buy_insurance(&state, &cfg()).unwrap();
        assert_eq!(outcome.cost, 500);
        assert!((outcome.coverage_percent - 80.0).abs() < f64::EPSILON);
        assert_eq!(next.wallet.cash, 9_500);
        assert!(next.farm.insured);

        assert_eq!(
            buy_insurance(&next, &cfg()).unwrap_err(),
            EngineError::AlreadyInsured
        );
    }

    #[test]
    fn yield_scales_with_health() {
        assert!((harvest_yield(50.0, 80.0) - 40.0).abs() < f64::EPSILON);
        assert!((harvest_yield(50.0, 100.0) - 50.0).abs() < f64::EPSILON);
        assert!((harvest_yield(33.3, 50.0) - 16.7).abs() < f64::EPSILON);
    }

    #[test]
    fn harvest_requires_harvest_stage() {
        let mut state = GameState::default();
        state.season_day = 45;
        state.season_stage = SeasonStage::Growing;
        assert_eq!(harvest(&state).unwrap_err(), EngineError::NotHarvestSeason);

        state.season_day = 95;
        state.season_stage = SeasonStage::Harvest;
        state.farm.crop_health = 80.0;
        state.farm.expected_harvest = 50.0;
        let (next, outcome) = harvest(&state).unwrap();
        assert!((outcome.quantity - 40.0).abs() < f64::EPSILON);
        assert!((next.market.harvest_quantity - 40.0).abs() < f64::EPSILON);
        assert_eq!(next.farm.crop_stage, 3);
        assert!((next.farm.growth_percent - 100.0).abs() < f64::EPSILON);
    }
}
