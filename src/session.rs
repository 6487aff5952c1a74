//! A live per-user session: validated transitions plus write-behind
//! persistence.
//!
//! Every mutating call runs the transition against the current state,
//! persists the candidate document, and only then swaps it in. A
//! persistence failure therefore leaves the in-memory state untouched.

use crate::config::GameConfig;
use crate::credit::{self, ContributionOutcome, LoanOutcome, RepaymentOutcome};
use crate::day::{self, DayOutcome};
use crate::decision::{self, DecisionChoice, DecisionOutcome};
use crate::error::EngineError;
use crate::farm::{self, FertilizerOutcome, HarvestOutcome, InsuranceOutcome, SowOutcome};
use crate::market::{self, SaleOutcome, StorageOutcome};
use crate::persist::{persist_with_fallback, replay_offline_queue, ReplayReport};
use crate::state::{CreditSource, CropKind, GameState, PaymentMode};
use crate::summary::{self, SeasonSummary};
use crate::{DecisionLog, LocalCache, StateStore};

/// One user's loaded game plus the backends it persists through.
pub struct GameSession<S, C, L> {
    user_id: String,
    state: GameState,
    config: GameConfig,
    store: S,
    cache: C,
    decision_log: L,
}

impl<S, C, L> GameSession<S, C, L>
where
    S: StateStore,
    C: LocalCache,
    L: DecisionLog,
{
    pub(crate) fn new(
        user_id: String,
        state: GameState,
        config: GameConfig,
        store: S,
        cache: C,
        decision_log: L,
    ) -> Self {
        Self {
            user_id,
            state,
            config,
            store,
            cache,
            decision_log,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Persist a candidate state and swap it in on success.
    fn commit(&mut self, action: &str, next: GameState) -> Result<(), EngineError> {
        persist_with_fallback(&self.store, &self.cache, &self.user_id, action, &next)?;
        self.state = next;
        Ok(())
    }

    /// Advance the simulation by one day.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] when the new day cannot be
    /// persisted anywhere; the session then stays on the old day.
    pub fn advance_day(&mut self) -> Result<DayOutcome, EngineError> {
        let (next, outcome) = day::advance_day(&self.state, &self.config);
        self.commit("advance_day", next)?;
        Ok(outcome)
    }

    /// Buy and sow seeds for `crop`.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the farm module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn buy_seeds(&mut self, crop: CropKind) -> Result<SowOutcome, EngineError> {
        let (next, outcome) = farm::buy_seeds(&self.state, &self.config, crop)?;
        self.commit("buy_seeds", next)?;
        Ok(outcome)
    }

    /// Apply fertilizer to the current planting.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the farm module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn apply_fertilizer(&mut self) -> Result<FertilizerOutcome, EngineError> {
        let (next, outcome) = farm::apply_fertilizer(&self.state)?;
        self.commit("apply_fertilizer", next)?;
        Ok(outcome)
    }

    /// Buy crop insurance for the current planting.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the farm module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn buy_insurance(&mut self) -> Result<InsuranceOutcome, EngineError> {
        let (next, outcome) = farm::buy_insurance(&self.state, &self.config)?;
        self.commit("buy_insurance", next)?;
        Ok(outcome)
    }

    /// Bring in the harvest during the harvest stage.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the farm module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn harvest(&mut self) -> Result<HarvestOutcome, EngineError> {
        let (next, outcome) = farm::harvest(&self.state)?;
        self.commit("harvest", next)?;
        Ok(outcome)
    }

    /// Sell quintals at the current market price.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the market module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn sell_harvest(
        &mut self,
        quantity: f64,
        payment: PaymentMode,
    ) -> Result<SaleOutcome, EngineError> {
        let (next, outcome) = market::sell_harvest(&self.state, quantity, payment)?;
        self.commit("sell_harvest", next)?;
        Ok(outcome)
    }

    /// Move harvested quintals into storage.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the market module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn store_harvest(&mut self, quantity: f64) -> Result<StorageOutcome, EngineError> {
        let (next, outcome) = market::store_harvest(&self.state, quantity)?;
        self.commit("store_harvest", next)?;
        Ok(outcome)
    }

    /// Borrow from a credit source.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the credit module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn take_loan(
        &mut self,
        source: CreditSource,
        amount: i64,
    ) -> Result<LoanOutcome, EngineError> {
        let (next, outcome) = credit::take_loan(&self.state, &self.config, source, amount)?;
        self.commit("take_loan", next)?;
        Ok(outcome)
    }

    /// Pay down outstanding debt.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the credit module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn repay_loan(&mut self, amount: i64) -> Result<RepaymentOutcome, EngineError> {
        let (next, outcome) = credit::repay_loan(&self.state, amount)?;
        self.commit("repay_loan", next)?;
        Ok(outcome)
    }

    /// Contribute cash to the cooperative savings pool.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the credit module and
    /// [`EngineError::Persistence`] from the commit.
    pub fn contribute(&mut self, amount: i64) -> Result<ContributionOutcome, EngineError> {
        let (next, outcome) = credit::contribute(&self.state, amount)?;
        self.commit("contribute", next)?;
        Ok(outcome)
    }

    /// Apply a story choice and log it to the decision trail.
    ///
    /// The decision log is advisory: a logging failure is reported as a
    /// warning and never rolls back the committed state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] from the commit.
    pub fn apply_decision(
        &mut self,
        story_id: &str,
        choice: &DecisionChoice,
    ) -> Result<DecisionOutcome, EngineError> {
        let (next, outcome) = decision::apply_decision(&self.state, story_id, choice);
        self.commit("apply_decision", next)?;
        if let Err(e) = self.decision_log.record(&self.user_id, &outcome.record) {
            log::warn!("decision log write failed for {}: {e}", self.user_id);
        }
        Ok(outcome)
    }

    /// Award an achievement once. Returns whether it was newly earned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] from the commit.
    pub fn award_achievement(&mut self, id: &str) -> Result<bool, EngineError> {
        if self.state.achievements.contains(id) {
            return Ok(false);
        }
        let mut next = self.state.clone();
        next.achievements.insert(id.to_owned());
        self.commit("award_achievement", next)?;
        Ok(true)
    }

    /// Roll up the current season's ledger.
    #[must_use]
    pub fn season_summary(&self) -> SeasonSummary {
        summary::season_summary(&self.state)
    }

    /// Current cooperative borrowing ceiling.
    #[must_use]
    pub fn loan_eligibility(&self) -> i64 {
        credit::loan_eligibility(
            self.state.cooperative.savings_balance,
            self.state.cooperative.reputation,
        )
    }

    /// Replay deferred writes against the remote store.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] when the surviving queue
    /// cannot be written back to the cache.
    pub fn sync_offline_queue(&self) -> Result<ReplayReport, EngineError> {
        replay_offline_queue(&self.store, &self.cache)
    }
}
