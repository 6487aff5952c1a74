//! Error taxonomy for engine operations.
//!
//! Every variant except [`EngineError::Persistence`] is a precondition
//! failure detected before any new state is produced; an operation that
//! returns one of them has not changed the session document at all.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("insufficient cash for this operation")]
    InsufficientFunds,
    #[error("requested quantity exceeds harvest plus storage")]
    InsufficientQuantity,
    #[error("requested quantity exceeds unstored harvest")]
    InsufficientHarvest,
    #[error("crop type is not in the catalog")]
    InvalidCrop,
    #[error("credit source is not configured")]
    InvalidSource,
    #[error("crop is already insured")]
    AlreadyInsured,
    #[error("a cooperative loan is already active")]
    ActiveLoanExists,
    #[error("loan amount is outside the permitted range")]
    ExceedsLimit,
    #[error("harvest is only possible during the harvest stage")]
    NotHarvestSeason,
    #[error("no game state is loaded for this user")]
    NoActiveSession,
    #[error("state could not be persisted remotely or locally: {0}")]
    Persistence(String),
}

impl EngineError {
    /// Stable tag for hosts that key UI strings off error identity.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::InsufficientFunds => "insufficient_funds",
            Self::InsufficientQuantity => "insufficient_quantity",
            Self::InsufficientHarvest => "insufficient_harvest",
            Self::InvalidCrop => "invalid_crop",
            Self::InvalidSource => "invalid_source",
            Self::AlreadyInsured => "already_insured",
            Self::ActiveLoanExists => "active_loan_exists",
            Self::ExceedsLimit => "exceeds_limit",
            Self::NotHarvestSeason => "not_harvest_season",
            Self::NoActiveSession => "no_active_session",
            Self::Persistence(_) => "persistence",
        }
    }
}
