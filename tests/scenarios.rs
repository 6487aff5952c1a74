//! Acceptance scenarios for the published balance math.

mod common;

use common::{MemoryCache, MemoryStore, RecordingDecisionLog};
use kisanverse_game::{
    CreditSource, EngineError, GameConfig, GameEngine, PaymentMode, harvest_yield,
    loan_eligibility, price_for_day,
};

fn engine() -> GameEngine<MemoryStore, MemoryCache, RecordingDecisionLog> {
    GameEngine::new(
        MemoryStore::default(),
        MemoryCache::default(),
        RecordingDecisionLog::default(),
        GameConfig::default_config(),
    )
}

#[test]
fn harvest_glut_discounts_the_base_price() {
    // Rice at 520 on day 100 lands in the glut window.
    assert_eq!(price_for_day(520, 100), 416);
}

#[test]
fn lean_window_marks_up_the_base_price() {
    // Rice at 520 on day 10 carries scarcity pricing.
    assert_eq!(price_for_day(520, 10), 676);
}

#[test]
fn yield_scales_linearly_with_health() {
    let quantity = harvest_yield(50.0, 80.0);
    assert!((quantity - 40.0).abs() < f64::EPSILON);
}

#[test]
fn cooperative_ceiling_follows_savings_and_reputation() {
    assert_eq!(loan_eligibility(1_000, 3.0), 4_000);
}

#[test]
fn cooperative_loan_at_the_ceiling_succeeds_and_above_it_fails() {
    let engine = engine();
    let mut session = engine.create_session("farmer", 7).unwrap();
    session.contribute(1_000).unwrap();
    assert_eq!(session.loan_eligibility(), loan_eligibility(1_000, 3.1));

    let ceiling = session.loan_eligibility();
    assert_eq!(
        session.take_loan(CreditSource::Cooperative, ceiling + 1_000).unwrap_err(),
        EngineError::ExceedsLimit
    );

    let outcome = session.take_loan(CreditSource::Cooperative, 4_000).unwrap();
    assert_eq!(outcome.term_days, Some(60));
    let loan = session.state().cooperative.active_loan.as_ref().unwrap();
    assert_eq!(loan.days_remaining, 60);
    assert_eq!(session.state().wallet.debt, 4_000);
}

#[test]
fn digital_sale_earns_premium_and_adoption_score() {
    let engine = engine();
    let session = engine.create_session("farmer", 11).unwrap();
    let cash_before = session.state().wallet.cash;
    let digital_before = session.state().scores.digital_adoption_score;

    // Seed a sellable harvest at a known price.
    {
        let mut staged = session.state().clone();
        staged.market.harvest_quantity = 10.0;
        staged.market.current_price = 500;
        let (next, outcome) =
            kisanverse_game::market::sell_harvest(&staged, 10.0, PaymentMode::Digital).unwrap();
        assert_eq!(outcome.total_value, 5_250);
        assert_eq!(next.wallet.cash, cash_before + 5_250);
        assert!(
            (next.scores.digital_adoption_score - (digital_before + 5.0)).abs() < f64::EPSILON
        );
    }
}

#[test]
fn repaying_a_cooperative_loan_restores_standing() {
    let engine = engine();
    let mut session = engine.create_session("farmer", 13).unwrap();
    session.contribute(2_000).unwrap();
    session.take_loan(CreditSource::Cooperative, 5_000).unwrap();
    let reputation_before = session.state().cooperative.reputation;

    let outcome = session.repay_loan(5_000).unwrap();
    assert!(outcome.loan_settled);
    assert_eq!(session.state().wallet.debt, 0);
    assert!(session.state().cooperative.active_loan.is_none());
    assert!(
        (session.state().cooperative.reputation - (reputation_before + 0.5)).abs() < 1e-9
    );
    assert_eq!(session.state().cooperative.loan_history.len(), 1);
}

#[test]
fn decisions_reach_the_external_log() {
    let log = RecordingDecisionLog::default();
    let engine = GameEngine::new(
        MemoryStore::default(),
        MemoryCache::default(),
        log.clone(),
        GameConfig::default_config(),
    );
    let mut session = engine.create_session("farmer", 17).unwrap();

    let choice = kisanverse_game::DecisionChoice {
        choice_id: String::from("save_it"),
        consequences: kisanverse_game::Consequences {
            wallet_change: -500,
            savings_change: 500,
            resilience_change: 4.0,
            ..kisanverse_game::Consequences::default()
        },
    };
    let outcome = session.apply_decision("windfall", &choice).unwrap();
    assert_eq!(outcome.record.outcome, kisanverse_game::DecisionLeaning::Positive);

    let recorded = log.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "farmer");
    assert_eq!(recorded[0].1.story_id, "windfall");
    assert_eq!(recorded[0].1.choice_id, "save_it");
}

#[test]
fn achievements_are_awarded_once() {
    let engine = engine();
    let mut session = engine.create_session("farmer", 19).unwrap();
    assert!(session.award_achievement("first_contribution").unwrap());
    assert!(!session.award_achievement("first_contribution").unwrap());
    assert!(session.state().achievements.contains("first_contribution"));
}
