//! Market pricing, harvest sales, and storage.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DIGITAL_ADOPTION_SALE_BONUS, DIGITAL_PAYMENT_PREMIUM, GLUT_PRICE_MULTIPLIER,
    GLUT_WINDOW_END_DAY, GLUT_WINDOW_START_DAY, LEAN_PRICE_MULTIPLIER, LEAN_WINDOW_END_DAY,
};
use crate::error::EngineError;
use crate::numbers::{i64_to_f64, round_f64_to_i64};
use crate::state::{GameState, IncomeKind, PaymentMode};

/// Seasonal price for a crop on a given day-within-season.
///
/// Prices sag 20% in the harvest glut window (days 90..=120) and rise
/// 30% in the lean window (days below 30); otherwise the base price
/// passes through. Rounded to whole rupees.
#[must_use]
pub fn price_for_day(base_price: i64, season_day: u32) -> i64 {
    if (GLUT_WINDOW_START_DAY..=GLUT_WINDOW_END_DAY).contains(&season_day) {
        round_f64_to_i64(i64_to_f64(base_price) * GLUT_PRICE_MULTIPLIER)
    } else if season_day < LEAN_WINDOW_END_DAY {
        round_f64_to_i64(i64_to_f64(base_price) * LEAN_PRICE_MULTIPLIER)
    } else {
        base_price
    }
}

/// Result of a completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub quantity: f64,
    /// Effective per-quintal price after any digital premium.
    pub unit_price: f64,
    /// Cash credited, rounded to whole rupees.
    pub total_value: i64,
    pub payment: PaymentMode,
}

/// Sell quintals at the current market price, fresh harvest first.
///
/// Digital settlement earns a 5% premium and +5 digital-adoption score.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientQuantity`] when `quantity` exceeds
/// harvest plus stored stock.
pub fn sell_harvest(
    state: &GameState,
    quantity: f64,
    payment: PaymentMode,
) -> Result<(GameState, SaleOutcome), EngineError> {
    let available = state.market.harvest_quantity + state.market.stored_quantity;
    if !quantity.is_finite() || quantity <= 0.0 || quantity > available {
        return Err(EngineError::InsufficientQuantity);
    }

    let mut next = state.clone();
    let mut unit_price = i64_to_f64(next.market.current_price);
    if payment.is_digital() {
        unit_price *= DIGITAL_PAYMENT_PREMIUM;
    }
    let total_value = round_f64_to_i64(quantity * unit_price);

    // Fresh harvest is drawn down before stored stock.
    if quantity <= next.market.harvest_quantity {
        next.market.harvest_quantity -= quantity;
    } else {
        let from_storage = quantity - next.market.harvest_quantity;
        next.market.harvest_quantity = 0.0;
        next.market.stored_quantity = (next.market.stored_quantity - from_storage).max(0.0);
    }

    next.wallet.cash += total_value;
    next.record_income(IncomeKind::HarvestSale, total_value, payment);
    if payment.is_digital() {
        next.scores.adjust_digital(DIGITAL_ADOPTION_SALE_BONUS);
    }

    let outcome = SaleOutcome {
        quantity,
        unit_price,
        total_value,
        payment,
    };
    Ok((next, outcome))
}

/// Result of moving harvest into storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageOutcome {
    pub moved: f64,
    pub stored_quantity: f64,
}

/// Move quintals from the fresh harvest into spoilage-prone storage.
/// Storing restarts the `days_stored` counter for the whole stored lot.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientHarvest`] when `quantity` exceeds
/// the unstored harvest.
pub fn store_harvest(
    state: &GameState,
    quantity: f64,
) -> Result<(GameState, StorageOutcome), EngineError> {
    if !quantity.is_finite() || quantity <= 0.0 || quantity > state.market.harvest_quantity {
        return Err(EngineError::InsufficientHarvest);
    }

    let mut next = state.clone();
    next.market.harvest_quantity -= quantity;
    next.market.stored_quantity += quantity;
    next.market.days_stored = 0;

    let outcome = StorageOutcome {
        moved: quantity,
        stored_quantity: next.market.stored_quantity,
    };
    Ok((next, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_curve_hits_published_scenarios() {
        // Harvest glut: 520 * 0.8
        assert_eq!(price_for_day(520, 100), 416);
        // Lean scarcity: 520 * 1.3
        assert_eq!(price_for_day(520, 10), 676);
        // Mid-season passthrough.
        assert_eq!(price_for_day(520, 45), 520);
        // Window edges.
        assert_eq!(price_for_day(520, 90), 416);
        assert_eq!(price_for_day(520, 120), 416);
        assert_eq!(price_for_day(520, 29), 676);
        assert_eq!(price_for_day(520, 30), 520);
    }

    #[test]
    fn digital_sale_credits_premium_and_score() {
        let mut state = GameState::default();
        state.market.current_price = 500;
        state.market.harvest_quantity = 12.0;
        let cash_before = state.wallet.cash;
        let digital_before = state.scores.digital_adoption_score;

        let (next, outcome) = sell_harvest(&state, 10.0, PaymentMode::Digital).unwrap();
        assert_eq!(outcome.total_value, 5_250);
        assert_eq!(next.wallet.cash, cash_before + 5_250);
        assert!(
            (next.scores.digital_adoption_score - (digital_before + 5.0)).abs() < f64::EPSILON
        );
        assert_eq!(next.income.last().map(|e| e.payment), Some(PaymentMode::Digital));
    }

    #[test]
    fn sale_draws_harvest_before_storage() {
        let mut state = GameState::default();
        state.market.current_price = 100;
        state.market.harvest_quantity = 4.0;
        state.market.stored_quantity = 6.0;

        let (next, _) = sell_harvest(&state, 7.0, PaymentMode::Cash).unwrap();
        assert!((next.market.harvest_quantity - 0.0).abs() < f64::EPSILON);
        assert!((next.market.stored_quantity - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sale_rejects_overdraw_without_mutation() {
        let mut state = GameState::default();
        state.market.harvest_quantity = 1.0;
        state.market.stored_quantity = 1.0;
        let err = sell_harvest(&state, 2.5, PaymentMode::Cash).unwrap_err();
        assert_eq!(err, EngineError::InsufficientQuantity);
        assert!((state.market.harvest_quantity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn storing_resets_days_stored() {
        let mut state = GameState::default();
        state.market.harvest_quantity = 10.0;
        state.market.stored_quantity = 2.0;
        state.market.days_stored = 9;

        let (next, outcome) = store_harvest(&state, 5.0).unwrap();
        assert!((outcome.stored_quantity - 7.0).abs() < f64::EPSILON);
        assert_eq!(next.market.days_stored, 0);
        assert!((next.market.harvest_quantity - 5.0).abs() < f64::EPSILON);

        assert_eq!(
            store_harvest(&next, 6.0).unwrap_err(),
            EngineError::InsufficientHarvest
        );
    }
}
