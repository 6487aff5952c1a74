//! Story-decision consequences applied atomically to the game state.

use serde::{Deserialize, Serialize};

use crate::constants::{LITERACY_NEGATIVE_DELTA, LITERACY_POSITIVE_DELTA};
use crate::state::GameState;

/// Consequence bundle attached to one story choice. Missing fields
/// deserialize to zero so content authors only spell out what changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Consequences {
    #[serde(default)]
    pub wallet_change: i64,
    #[serde(default)]
    pub savings_change: i64,
    #[serde(default)]
    pub debt_change: i64,
    #[serde(default)]
    pub resilience_change: f64,
    #[serde(default)]
    pub digital_score_change: f64,
    #[serde(default)]
    pub reputation_change: f64,
}

/// One selectable choice in a story node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionChoice {
    pub choice_id: String,
    pub consequences: Consequences,
}

/// Whether the choice is counted as a sound financial decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionLeaning {
    Positive,
    Negative,
}

/// Entry for the external decision log, emitted alongside the state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub story_id: String,
    pub choice_id: String,
    pub season_day: u32,
    pub outcome: DecisionLeaning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub consequences: Consequences,
    pub record: DecisionRecord,
}

/// Apply the consequences of a story choice.
///
/// Wallet, savings, and debt shift by the stated deltas with debt
/// floored at zero. Resilience, digital adoption, and reputation move
/// through their clamped adjusters. Financial literacy learns from the
/// resilience signal: +2 for a resilience-positive choice, -1 otherwise.
#[must_use]
pub fn apply_decision(
    state: &GameState,
    story_id: &str,
    choice: &DecisionChoice,
) -> (GameState, DecisionOutcome) {
    let c = choice.consequences;
    let mut next = state.clone();

    next.wallet.cash += c.wallet_change;
    next.wallet.savings += c.savings_change;
    next.wallet.debt = (next.wallet.debt + c.debt_change).max(0);
    next.scores.adjust_resilience(c.resilience_change);
    next.scores.adjust_digital(c.digital_score_change);
    next.cooperative.adjust_reputation(c.reputation_change);

    if c.resilience_change > 0.0 {
        next.scores.adjust_literacy(LITERACY_POSITIVE_DELTA);
    } else {
        next.scores.adjust_literacy(LITERACY_NEGATIVE_DELTA);
    }

    let leaning = if c.resilience_change >= 0.0 {
        DecisionLeaning::Positive
    } else {
        DecisionLeaning::Negative
    };
    let record = DecisionRecord {
        story_id: story_id.to_owned(),
        choice_id: choice.choice_id.clone(),
        season_day: next.season_day,
        outcome: leaning,
    };

    let outcome = DecisionOutcome {
        consequences: c,
        record,
    };
    (next, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(consequences: Consequences) -> DecisionChoice {
        DecisionChoice {
            choice_id: String::from("opt_a"),
            consequences,
        }
    }

    #[test]
    fn positive_choice_teaches_literacy() {
        let state = GameState::default();
        let c = choice(Consequences {
            wallet_change: -200,
            savings_change: 200,
            resilience_change: 5.0,
            ..Consequences::default()
        });

        let (next, outcome) = apply_decision(&state, "story_1", &c);
        assert_eq!(next.wallet.cash, 9_800);
        assert_eq!(next.wallet.savings, 5_200);
        assert!((next.scores.resilience_score - 55.0).abs() < f64::EPSILON);
        assert!((next.scores.financial_literacy_score - 32.0).abs() < f64::EPSILON);
        assert_eq!(outcome.record.outcome, DecisionLeaning::Positive);
        assert_eq!(outcome.record.story_id, "story_1");
    }

    #[test]
    fn negative_choice_erodes_literacy() {
        let state = GameState::default();
        let c = choice(Consequences {
            wallet_change: 500,
            resilience_change: -3.0,
            ..Consequences::default()
        });

        let (next, outcome) = apply_decision(&state, "story_2", &c);
        assert!((next.scores.financial_literacy_score - 29.0).abs() < f64::EPSILON);
        assert_eq!(outcome.record.outcome, DecisionLeaning::Negative);
    }

    #[test]
    fn neutral_resilience_counts_positive_but_costs_literacy() {
        let state = GameState::default();
        let c = choice(Consequences::default());
        let (next, outcome) = apply_decision(&state, "story_3", &c);
        assert_eq!(outcome.record.outcome, DecisionLeaning::Positive);
        assert!((next.scores.financial_literacy_score - 29.0).abs() < f64::EPSILON);
    }

    #[test]
    fn debt_is_floored_at_zero() {
        let mut state = GameState::default();
        state.wallet.debt = 300;
        let c = choice(Consequences {
            debt_change: -1_000,
            ..Consequences::default()
        });
        let (next, _) = apply_decision(&state, "story_4", &c);
        assert_eq!(next.wallet.debt, 0);
    }

    #[test]
    fn sparse_consequences_deserialize_with_defaults() {
        let parsed: Consequences = serde_json::from_str(r#"{"wallet_change": -50}"#).unwrap();
        assert_eq!(parsed.wallet_change, -50);
        assert_eq!(parsed.debt_change, 0);
        assert!((parsed.reputation_change - 0.0).abs() < f64::EPSILON);
    }
}
