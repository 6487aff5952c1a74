//! Credit: loan eligibility, borrowing, repayment, and cooperative savings.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::{
    COOP_LOAN_TERM_DAYS, DAYS_PER_YEAR, ELIGIBILITY_BASE_MULTIPLIER, ELIGIBILITY_REPUTATION_STEP,
    REPUTATION_CONTRIBUTION_BONUS, REPUTATION_MIN, REPUTATION_REPAYMENT_BONUS,
};
use crate::error::EngineError;
use crate::numbers::{i64_to_f64, round_f64_to_i64};
use crate::state::{
    ActiveLoan, CreditSource, ExpenseKind, GameState, IncomeKind, LoanRecord, PaymentMode,
};

/// Cooperative borrowing ceiling in rupees.
///
/// Eligibility is the member's pooled savings times a multiplier that
/// starts at 3x and grows half a turn for every reputation point above
/// the floor.
#[must_use]
pub fn loan_eligibility(savings_balance: i64, reputation: f64) -> i64 {
    let multiplier =
        ELIGIBILITY_BASE_MULTIPLIER + (reputation - REPUTATION_MIN) * ELIGIBILITY_REPUTATION_STEP;
    round_f64_to_i64(i64_to_f64(savings_balance) * multiplier)
}

/// Simple interest in rupees for a principal held over `days` at an
/// annual percentage rate.
#[must_use]
pub fn loan_interest(principal: i64, annual_rate_percent: f64, days: u32) -> i64 {
    let daily_rate = annual_rate_percent / 100.0 / DAYS_PER_YEAR;
    round_f64_to_i64(i64_to_f64(principal) * daily_rate * f64::from(days))
}

/// Result of taking a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOutcome {
    pub source: CreditSource,
    pub amount: i64,
    pub interest_rate: f64,
    /// Filled for cooperative loans, which carry a fixed repayment term.
    pub term_days: Option<u32>,
}

/// Borrow from a configured credit source.
///
/// Cooperative loans are gated on eligibility and on there being no
/// other cooperative loan outstanding. Bank and moneylender credit is
/// unconditional beyond the configured terms.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSource`] for an unconfigured source,
/// [`EngineError::ExceedsLimit`] for a non-positive amount or a
/// cooperative request above eligibility, and
/// [`EngineError::ActiveLoanExists`] when a cooperative loan is already
/// running.
pub fn take_loan(
    state: &GameState,
    cfg: &GameConfig,
    source: CreditSource,
    amount: i64,
) -> Result<(GameState, LoanOutcome), EngineError> {
    let terms = cfg.credit(source).ok_or(EngineError::InvalidSource)?;
    if amount <= 0 {
        return Err(EngineError::ExceedsLimit);
    }

    let mut next = state.clone();
    let mut term_days = None;

    if source == CreditSource::Cooperative {
        let limit = loan_eligibility(next.cooperative.savings_balance, next.cooperative.reputation);
        if amount > limit {
            return Err(EngineError::ExceedsLimit);
        }
        if next.cooperative.active_loan.is_some() {
            return Err(EngineError::ActiveLoanExists);
        }
        next.cooperative.active_loan = Some(ActiveLoan {
            amount,
            interest_rate: terms.interest_rate,
            days_remaining: COOP_LOAN_TERM_DAYS,
            issued: next.stamp(),
        });
        term_days = Some(COOP_LOAN_TERM_DAYS);
    }

    next.wallet.cash += amount;
    next.wallet.debt += amount;
    next.wallet.debt_source = Some(source);
    next.wallet.interest_rate = terms.interest_rate;
    next.record_income(IncomeKind::Loan, amount, PaymentMode::Cash);

    let outcome = LoanOutcome {
        source,
        amount,
        interest_rate: terms.interest_rate,
        term_days,
    };
    Ok((next, outcome))
}

/// Result of a repayment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentOutcome {
    /// Rupees actually applied to the debt, never more than was owed.
    pub amount_paid: i64,
    pub remaining_debt: i64,
    /// Set when the payment settled a cooperative loan.
    pub loan_settled: bool,
}

/// Pay down outstanding debt. Payments above the balance are clamped to
/// it, so only the owed portion leaves the wallet. Settling a
/// cooperative loan records it as repaid and lifts reputation.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientFunds`] when the requested amount
/// is non-positive or exceeds cash on hand.
pub fn repay_loan(
    state: &GameState,
    amount: i64,
) -> Result<(GameState, RepaymentOutcome), EngineError> {
    if amount <= 0 || amount > state.wallet.cash {
        return Err(EngineError::InsufficientFunds);
    }

    let mut next = state.clone();
    let amount_paid = amount.min(next.wallet.debt);
    next.wallet.cash -= amount_paid;
    next.wallet.debt -= amount_paid;

    let mut loan_settled = false;
    if next.wallet.debt == 0 {
        next.wallet.debt_source = None;
        next.wallet.interest_rate = 0.0;
        if let Some(loan) = next.cooperative.active_loan.take() {
            next.cooperative.loan_history.push(LoanRecord {
                amount: loan.amount,
                repaid_on_time: true,
                settled: next.stamp(),
            });
            next.cooperative.adjust_reputation(REPUTATION_REPAYMENT_BONUS);
            loan_settled = true;
        }
    }
    if amount_paid > 0 {
        next.record_expense(ExpenseKind::LoanRepayment, amount_paid);
    }

    let outcome = RepaymentOutcome {
        amount_paid,
        remaining_debt: next.wallet.debt,
        loan_settled,
    };
    Ok((next, outcome))
}

/// Result of a cooperative contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionOutcome {
    pub amount: i64,
    pub savings_balance: i64,
    pub reputation: f64,
}

/// Contribute cash to the cooperative savings pool. Each contribution
/// nudges reputation upward.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientFunds`] when the amount is
/// non-positive or exceeds cash on hand.
pub fn contribute(
    state: &GameState,
    amount: i64,
) -> Result<(GameState, ContributionOutcome), EngineError> {
    if amount <= 0 || amount > state.wallet.cash {
        return Err(EngineError::InsufficientFunds);
    }

    let mut next = state.clone();
    next.wallet.cash -= amount;
    next.cooperative.savings_balance += amount;
    next.cooperative.total_contributed += amount;
    next.wallet.coop_balance = next.cooperative.savings_balance;
    next.cooperative.adjust_reputation(REPUTATION_CONTRIBUTION_BONUS);

    let outcome = ContributionOutcome {
        amount,
        savings_balance: next.cooperative.savings_balance,
        reputation: next.cooperative.reputation,
    };
    Ok((next, outcome))
}
