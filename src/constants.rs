//! Centralized balance and tuning constants for the KisanVerse simulation.
//!
//! These values define the deterministic math for the core farm loop.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets. Per-crop and per-credit-source tables live in
//! [`crate::config`] because hosts may override them.

// Season calendar ----------------------------------------------------------
pub(crate) const SEASON_LENGTH_DAYS: u32 = 120;
pub(crate) const SOWING_LAST_DAY: u32 = 30;
pub(crate) const GROWING_LAST_DAY: u32 = 90;

// Farm tuning --------------------------------------------------------------
pub(crate) const DAILY_MAINTENANCE_COST: i64 = 50;
pub(crate) const GROWTH_DAILY_INCREMENT: f64 = 1.1;
pub(crate) const GROWTH_MAX_PERCENT: f64 = 100.0;
pub(crate) const CROP_STAGE_SPAN: f64 = 33.0;
pub(crate) const CROP_HEALTH_MIN: f64 = 0.0;
pub(crate) const CROP_HEALTH_MAX: f64 = 100.0;
pub(crate) const FERTILIZER_COST: i64 = 1_500;
pub(crate) const FERTILIZER_HEALTH_BONUS: f64 = 15.0;
pub(crate) const FERTILIZER_YIELD_MULTIPLIER: f64 = 1.10;

// Market tuning ------------------------------------------------------------
pub(crate) const GLUT_WINDOW_START_DAY: u32 = 90;
pub(crate) const GLUT_WINDOW_END_DAY: u32 = 120;
pub(crate) const GLUT_PRICE_MULTIPLIER: f64 = 0.8;
pub(crate) const LEAN_WINDOW_END_DAY: u32 = 30;
pub(crate) const LEAN_PRICE_MULTIPLIER: f64 = 1.3;
pub(crate) const PRICE_HISTORY_CAP: usize = 30;
pub(crate) const DIGITAL_PAYMENT_PREMIUM: f64 = 1.05;
pub(crate) const DIGITAL_ADOPTION_SALE_BONUS: f64 = 5.0;
pub(crate) const SPOILAGE_RISK_SCALE: f64 = 0.01;

// Random events ------------------------------------------------------------
pub(crate) const EVENT_DAILY_CHANCE: f64 = 0.10;

// Credit and cooperative ---------------------------------------------------
pub(crate) const COOP_LOAN_TERM_DAYS: u32 = 60;
pub(crate) const ELIGIBILITY_BASE_MULTIPLIER: f64 = 3.0;
pub(crate) const ELIGIBILITY_REPUTATION_STEP: f64 = 0.5;
pub(crate) const REPUTATION_MIN: f64 = 1.0;
pub(crate) const REPUTATION_MAX: f64 = 5.0;
pub(crate) const REPUTATION_REPAYMENT_BONUS: f64 = 0.5;
pub(crate) const REPUTATION_CONTRIBUTION_BONUS: f64 = 0.1;
pub(crate) const DAYS_PER_YEAR: f64 = 365.0;

// Scores -------------------------------------------------------------------
pub(crate) const SCORE_MIN: f64 = 0.0;
pub(crate) const SCORE_MAX: f64 = 100.0;
pub(crate) const LITERACY_POSITIVE_DELTA: f64 = 2.0;
pub(crate) const LITERACY_NEGATIVE_DELTA: f64 = -1.0;
pub(crate) const MONTHLY_EXPENSE_BASELINE: i64 = 5_000;
pub(crate) const RESILIENCE_BASE: f64 = 50.0;
pub(crate) const RESILIENCE_SAVINGS_CAP: f64 = 30.0;
pub(crate) const RESILIENCE_SAVINGS_PER_MONTH: f64 = 10.0;
pub(crate) const RESILIENCE_DEBT_CAP: f64 = 20.0;
pub(crate) const RESILIENCE_DEBT_SCALE: f64 = 10.0;
pub(crate) const RESILIENCE_DECISION_CAP: f64 = 20.0;

// Persistence --------------------------------------------------------------
pub(crate) const CACHE_KEY_GAME_STATE: &str = "kisanverse_game_state";
pub(crate) const CACHE_KEY_OFFLINE_QUEUE: &str = "kisanverse_offline_queue";
pub(crate) const CACHE_KEY_APPLIED_WRITES: &str = "kisanverse_applied_writes";
pub(crate) const CACHE_KEY_LAST_SYNC: &str = "kisanverse_last_sync";
pub(crate) const APPLIED_WRITES_MEMORY: usize = 32;
pub(crate) const IDEMPOTENCY_HASH_SEED: u64 = 0x4B49_5341_4E56_4552;
