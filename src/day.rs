//! The daily tick: calendar, upkeep, growth, spoilage, price, and events.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::config::GameConfig;
use crate::constants::{
    CROP_STAGE_SPAN, DAILY_MAINTENANCE_COST, GROWTH_DAILY_INCREMENT, GROWTH_MAX_PERCENT,
    MONTHLY_EXPENSE_BASELINE, SEASON_LENGTH_DAYS, SPOILAGE_RISK_SCALE,
};
use crate::events::{draw_event, FarmEvent};
use crate::market::price_for_day;
use crate::numbers::i64_to_f64;
use crate::state::{ExpenseKind, GameState, Season, SeasonStage};

/// What happened during one advanced day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOutcome {
    pub day: u32,
    pub season: Season,
    pub stage: SeasonStage,
    /// Set when the calendar wrapped into a new season.
    pub rolled_over: bool,
    /// Daily maintenance charged, zero outside the growing stage.
    pub daily_expense: i64,
    /// Quintals lost to spoilage overnight.
    pub spoiled: f64,
    pub event: Option<FarmEvent>,
}

/// Advance the simulation by exactly one day.
///
/// Order is fixed: calendar first, then growing-stage upkeep and growth,
/// storage spoilage, the market price for the new day, and finally the
/// random event draw. Only the event's crop-health impact feeds back
/// into state.
#[must_use]
pub fn advance_day(state: &GameState, cfg: &GameConfig) -> (GameState, DayOutcome) {
    let mut next = state.clone();

    // Calendar. Day 120 rolls into day 1 of the next season.
    next.season_day += 1;
    let rolled_over = next.season_day > SEASON_LENGTH_DAYS;
    if rolled_over {
        next.season_day = 1;
        next.current_season = next.current_season.next();
        next.total_seasons_played += 1;
    }
    next.season_stage = SeasonStage::for_day(next.season_day);

    // Growing-stage upkeep and growth.
    let mut daily_expense = 0;
    if next.season_stage == SeasonStage::Growing {
        daily_expense = DAILY_MAINTENANCE_COST;
        next.wallet.cash -= DAILY_MAINTENANCE_COST;
        next.record_expense(ExpenseKind::Daily, DAILY_MAINTENANCE_COST);

        next.farm.growth_percent =
            (next.farm.growth_percent + GROWTH_DAILY_INCREMENT).min(GROWTH_MAX_PERCENT);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            next.farm.crop_stage = ((next.farm.growth_percent / CROP_STAGE_SPAN) as u8).min(3);
        }
    }

    // Storage spoilage. The daily loss is a small fraction of the lot,
    // so it is subtracted unrounded; rounding belongs to display only.
    let mut spoiled = 0.0;
    if next.market.stored_quantity > 0.0 {
        next.market.days_stored += 1;
        let risk = cfg.storage.spoilage_risk;
        spoiled = next.market.stored_quantity * risk * SPOILAGE_RISK_SCALE;
        next.market.stored_quantity = (next.market.stored_quantity - spoiled).max(0.0);
        next.market.spoilage_percent = f64::from(next.market.days_stored) * risk * 100.0;
    }

    next.scores.savings_buffer =
        i64_to_f64(next.wallet.savings) / i64_to_f64(MONTHLY_EXPENSE_BASELINE);

    // Market price for the new day.
    let base_price = cfg.crop_or_rice(next.farm.crop).base_price;
    next.market.current_price = price_for_day(base_price, next.season_day);
    next.market.push_price(next.season_day, next.market.current_price);

    // Event draw last, so earlier steps never depend on the RNG stream.
    let seed = next.seed;
    let rng = next
        .rng
        .get_or_insert_with(|| ChaCha20Rng::seed_from_u64(seed));
    let event = draw_event(rng);
    if let Some(ref drawn) = event {
        next.farm.adjust_health(drawn.crop_health_delta);
    }

    let outcome = DayOutcome {
        day: next.season_day,
        season: next.current_season,
        stage: next.season_stage,
        rolled_over,
        daily_expense,
        spoiled,
        event,
    };
    (next, outcome)
}
