//! KisanVerse Game Engine
//!
//! Platform-agnostic simulation core for the KisanVerse financial-literacy
//! farming game. This crate provides all season, market, credit, and
//! persistence mechanics without UI or platform-specific dependencies.
#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod credit;
pub mod day;
pub mod decision;
pub mod error;
pub mod events;
pub mod farm;
pub mod market;
pub mod numbers;
pub mod persist;
pub mod session;
pub mod state;
pub mod summary;

// Re-export commonly used types
pub use config::{CreditCfg, CropCfg, GameConfig, InsuranceCfg, StorageCfg};
pub use credit::{
    ContributionOutcome, LoanOutcome, RepaymentOutcome, loan_eligibility, loan_interest,
};
pub use day::{DayOutcome, advance_day};
pub use decision::{
    Consequences, DecisionChoice, DecisionLeaning, DecisionOutcome, DecisionRecord,
};
pub use error::EngineError;
pub use events::{EventSeverity, FarmEvent, FarmEventKind};
pub use farm::{
    FertilizerOutcome, HarvestOutcome, InsuranceOutcome, SowOutcome, harvest_yield,
};
pub use market::{SaleOutcome, StorageOutcome, price_for_day};
pub use persist::{OfflineQueue, PersistOutcome, QueuedWrite, ReplayReport};
pub use session::GameSession;
pub use state::{
    ActiveLoan, Cooperative, CreditSource, CropKind, ExpenseEntry, ExpenseKind, Farm, GameState,
    IncomeEntry, IncomeKind, LoanRecord, Market, PaymentMode, PricePoint, Scores, Season,
    SeasonStage, SeasonStamp, Wallet,
};
pub use summary::{SeasonSummary, resilience_score, season_summary};

/// Trait for abstracting the remote state store.
/// Platform-specific implementations should provide this.
pub trait StateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the persisted state document for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or the document
    /// cannot be decoded.
    fn load(&self, user_id: &str) -> Result<Option<GameState>, Self::Error>;

    /// Save the state document for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn save(&self, user_id: &str, state: &GameState) -> Result<(), Self::Error>;
}

/// Trait for abstracting the device-local key-value cache.
pub trait LocalCache {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a cached value.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a cached value.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Trait for the append-only decision trail.
pub trait DecisionLog {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one decision record for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be appended.
    fn record(&self, user_id: &str, record: &DecisionRecord) -> Result<(), Self::Error>;
}

/// Main engine for creating and resuming per-user sessions.
pub struct GameEngine<S, C, L>
where
    S: StateStore + Clone,
    C: LocalCache + Clone,
    L: DecisionLog + Clone,
{
    store: S,
    cache: C,
    decision_log: L,
    config: GameConfig,
}

impl<S, C, L> GameEngine<S, C, L>
where
    S: StateStore + Clone,
    C: LocalCache + Clone,
    L: DecisionLog + Clone,
{
    /// Create an engine over the provided backends and configuration.
    pub const fn new(store: S, cache: C, decision_log: L, config: GameConfig) -> Self {
        Self {
            store,
            cache,
            decision_log,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh game for `user_id` with a deterministic seed and
    /// persist the initial document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] when the initial state
    /// cannot be persisted anywhere.
    pub fn create_session(
        &self,
        user_id: &str,
        seed: u64,
    ) -> Result<GameSession<S, C, L>, EngineError> {
        let state = GameState::default().with_seed(seed);
        persist::persist_with_fallback(&self.store, &self.cache, user_id, "create_game", &state)?;
        Ok(GameSession::new(
            user_id.to_owned(),
            state,
            self.config.clone(),
            self.store.clone(),
            self.cache.clone(),
            self.decision_log.clone(),
        ))
    }

    /// Resume an existing game, preferring the remote store and falling
    /// back to the device cache when the store is unreachable or empty.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveSession`] when neither backend
    /// holds a state document for the user.
    pub fn start_session(&self, user_id: &str) -> Result<GameSession<S, C, L>, EngineError> {
        let state = match self.store.load(user_id) {
            Ok(Some(state)) => state.rehydrate(),
            Ok(None) => persist::cached_state(&self.cache).ok_or(EngineError::NoActiveSession)?,
            Err(e) => {
                log::warn!("remote load failed for {user_id}, trying cache: {e}");
                persist::cached_state(&self.cache).ok_or(EngineError::NoActiveSession)?
            }
        };
        Ok(GameSession::new(
            user_id.to_owned(),
            state,
            self.config.clone(),
            self.store.clone(),
            self.cache.clone(),
            self.decision_log.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore {
        saves: Rc<RefCell<HashMap<String, GameState>>>,
    }

    impl StateStore for MemoryStore {
        type Error = Infallible;

        fn load(&self, user_id: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(self.saves.borrow().get(user_id).cloned())
        }

        fn save(&self, user_id: &str, state: &GameState) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(user_id.to_string(), state.clone());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MemoryCache {
        values: Rc<RefCell<HashMap<String, String>>>,
    }

    impl LocalCache for MemoryCache {
        type Error = Infallible;

        fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct NullLog;

    impl DecisionLog for NullLog {
        type Error = Infallible;

        fn record(&self, _user_id: &str, _record: &DecisionRecord) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn engine() -> GameEngine<MemoryStore, MemoryCache, NullLog> {
        GameEngine::new(
            MemoryStore::default(),
            MemoryCache::default(),
            NullLog,
            GameConfig::default_config(),
        )
    }

    #[test]
    fn engine_creates_and_resumes_a_session() {
        let engine = engine();
        let mut session = engine.create_session("farmer_1", 0xABCD).unwrap();
        session.advance_day().unwrap();
        session.advance_day().unwrap();
        assert_eq!(session.state().season_day, 3);

        let resumed = engine.start_session("farmer_1").unwrap();
        assert_eq!(resumed.state().season_day, 3);
        assert_eq!(resumed.state().seed, 0xABCD);
        assert!(resumed.state().rng.is_some());
    }

    #[test]
    fn start_session_without_any_state_is_an_error() {
        let engine = engine();
        assert_eq!(
            engine.start_session("ghost").err(),
            Some(EngineError::NoActiveSession)
        );
    }
}
