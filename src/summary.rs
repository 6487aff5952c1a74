//! End-of-season feedback: ledger rollups and the resilience formula.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MONTHLY_EXPENSE_BASELINE, RESILIENCE_BASE, RESILIENCE_DEBT_CAP, RESILIENCE_DEBT_SCALE,
    RESILIENCE_DECISION_CAP, RESILIENCE_SAVINGS_CAP, RESILIENCE_SAVINGS_PER_MONTH, SCORE_MAX,
    SCORE_MIN,
};
use crate::numbers::i64_to_f64;
use crate::state::{GameState, Season};

/// Snapshot of one season's finances and progress scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub seasons_played: u32,
    pub total_earnings: i64,
    pub total_expenses: i64,
    pub net_profit: i64,
    pub resilience_score: f64,
    pub financial_literacy_score: f64,
    pub digital_adoption_score: f64,
    /// Months of baseline expenses the savings pool would cover.
    pub savings_buffer: f64,
    pub achievements: Vec<String>,
}

/// Roll up the ledger for the season currently in progress.
#[must_use]
pub fn season_summary(state: &GameState) -> SeasonSummary {
    let season_id = state.season_id();
    let total_earnings: i64 = state
        .income
        .iter()
        .filter(|e| e.season_id == season_id)
        .map(|e| e.amount)
        .sum();
    let total_expenses: i64 = state
        .expenses
        .iter()
        .filter(|e| e.season_id == season_id)
        .map(|e| e.amount)
        .sum();

    SeasonSummary {
        season: state.current_season,
        seasons_played: state.total_seasons_played,
        total_earnings,
        total_expenses,
        net_profit: total_earnings - total_expenses,
        resilience_score: state.scores.resilience_score,
        financial_literacy_score: state.scores.financial_literacy_score,
        digital_adoption_score: state.scores.digital_adoption_score,
        savings_buffer: i64_to_f64(state.wallet.savings) / i64_to_f64(MONTHLY_EXPENSE_BASELINE),
        achievements: state.achievements.iter().cloned().collect(),
    }
}

/// Recompute the resilience score from its household inputs.
///
/// Starts at 50, earns up to 30 points for savings measured in months
/// of baseline expenses, loses up to 20 for the debt load relative to
/// liquid assets (the denominator carries a +1 so an empty household is
/// well-defined), and earns up to 20 for the share of sound decisions.
/// The result is rounded to a whole point.
#[must_use]
pub fn resilience_score(
    savings: i64,
    debt: i64,
    cash: i64,
    positive_decisions: u32,
    total_decisions: u32,
) -> f64 {
    let months_covered = i64_to_f64(savings) / i64_to_f64(MONTHLY_EXPENSE_BASELINE);
    let savings_points = (months_covered * RESILIENCE_SAVINGS_PER_MONTH).min(RESILIENCE_SAVINGS_CAP);

    let liquid = i64_to_f64(cash + savings + 1);
    let debt_ratio = i64_to_f64(debt.max(0)) / liquid;
    let debt_penalty = (debt_ratio * RESILIENCE_DEBT_SCALE).min(RESILIENCE_DEBT_CAP);

    let decision_points = if total_decisions == 0 {
        0.0
    } else {
        f64::from(positive_decisions) / f64::from(total_decisions) * RESILIENCE_DECISION_CAP
    };

    (RESILIENCE_BASE + savings_points - debt_penalty + decision_points)
        .round()
        .clamp(SCORE_MIN, SCORE_MAX)
}
