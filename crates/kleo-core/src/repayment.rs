//! Loan repayment arithmetic
//!
//! Simple (non-compounding) interest over the full fixed term:
//!
//! `interest = principal · rate · term / (SECONDS_PER_YEAR · RATE_SCALE)`
//!
//! The whole obligation is fixed at origination; it does not accrue daily
//! and does not reprice with pool utilization. The only post-origination
//! adjustment is the overdue penalty, `principal · penalty_bps / 10_000`,
//! added to the remaining debt once `now` passes the due time.
//!
//! Every function here is pure: same `(loan, now, penalty)` in, same figures
//! out.

use kleo_common::{
    math, KleoError, LoanSnapshot, LoanStatus, MathError, Result, RATE_SCALE, SECONDS_PER_DAY,
    SECONDS_PER_YEAR,
};

/// Derived repayment figures for one loan at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepaymentStatus {
    /// Principal plus fixed-term interest
    pub total_repayment: u128,
    /// Still owed now, penalty included, clamped at zero
    pub remaining_debt: u128,
    pub is_overdue: bool,
    /// Whole days until the due time, 0 once due or not yet active
    pub days_remaining: u64,
}

/// Fixed-term interest for a loan's parameters.
pub fn interest(principal: u128, rate: u64, term_seconds: u64) -> Result<u128> {
    let scaled = math::mul_div(principal, rate as u128, RATE_SCALE as u128)
        .map_err(KleoError::Math)?;
    math::mul_div(scaled, term_seconds as u128, SECONDS_PER_YEAR as u128)
        .map_err(KleoError::Math)
}

/// Principal plus interest. Prefers the ledger's own
/// `total_repayment_amount` when the snapshot carries one.
pub fn total_repayment(loan: &LoanSnapshot) -> Result<u128> {
    if let Some(authoritative) = loan.total_repayment_amount {
        return Ok(authoritative);
    }
    let interest = interest(loan.principal, loan.interest_rate, loan.term_seconds)?;
    loan.principal
        .checked_add(interest)
        .ok_or_else(|| MathError::ArithmeticOverflow.into())
}

/// Full repayment picture for a loan at `now` (Unix seconds).
///
/// `penalty_rate_bps` is the pool's late-payment policy in plain basis
/// points; pass 0 when the pool charges none.
pub fn compute_repayment_status(
    loan: &LoanSnapshot,
    now: u64,
    penalty_rate_bps: u32,
) -> Result<RepaymentStatus> {
    loan.check_integrity()?;

    let total = total_repayment(loan)?;
    let outstanding = total.saturating_sub(loan.amount_repaid);

    let (is_overdue, days_remaining) = match loan.due_time() {
        Some(due) if loan.status == LoanStatus::Active => (
            now > due,
            due.saturating_sub(now) / SECONDS_PER_DAY,
        ),
        _ => (false, 0),
    };

    let remaining_debt = match loan.status {
        LoanStatus::Repaid => 0,
        LoanStatus::Active if is_overdue => {
            let penalty = math::percentage_of(loan.principal, penalty_rate_bps)
                .map_err(KleoError::Math)?;
            outstanding
                .checked_add(penalty)
                .ok_or(MathError::ArithmeticOverflow)?
        }
        _ => outstanding,
    };

    Ok(RepaymentStatus {
        total_repayment: total,
        remaining_debt,
        is_overdue,
        days_remaining,
    })
}
