//! Vouch risk ledger - capital and reputation at risk, per voucher
//!
//! A pure read model over a loan and its vouches; mutation happens on-chain.
//! A voucher stakes two things against a borrower's default: a percentage of
//! the loan's principal in capital, and a number of stars. The full star
//! stake is at risk on default; nothing beyond opportunity cost is at risk
//! on repayment.
//!
//! Out-of-range vouch data is surfaced as a typed error, never silently
//! clamped: a capital percent outside `[0, 100]` or a committed sum past the
//! principal means the mirrored ledger has diverged from the authoritative
//! one, and a clamped figure would hide exactly the divergence the caller
//! needs to see.

use tracing::warn;

use kleo_common::{
    math, AccountId, KleoError, LoanSnapshot, Result, VouchSnapshot, VouchStatus, BPS_DENOMINATOR,
};

/// Risk figures for one voucher on one loan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherRisk {
    pub voucher: AccountId,
    /// Principal share this voucher covers if the loan defaults
    pub capital_at_risk: u128,
    pub capital_percent: u8,
    /// Stars lost on default
    pub reputation_at_risk: u32,
    pub status: VouchStatus,
}

/// Aggregate risk picture for a loan's vouches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VouchRiskReport {
    pub per_voucher: Vec<VoucherRisk>,
    /// Committed capital over Active vouches, derived from the summed
    /// percent so that exactly 100% covers the principal exactly (summing
    /// per-voucher floors would undershoot by division dust)
    pub total_capital_committed: u128,
    /// Σ capital percent over Active vouches
    pub total_capital_percent: u32,
    /// Σ stars staked over Active vouches
    pub total_stars_staked: u32,
}

impl VouchRiskReport {
    /// Whether accumulated capital covers the full principal, the coverage
    /// the activation guard commonly requires.
    pub fn covers_principal(&self, loan: &LoanSnapshot) -> bool {
        self.total_capital_committed >= loan.principal
    }
}

/// Derive per-voucher and aggregate risk for a loan.
///
/// Released and Slashed vouches appear in `per_voucher` (their history is
/// still displayable) but only Active ones count toward the aggregates.
pub fn compute_vouch_risk(loan: &LoanSnapshot, vouches: &[VouchSnapshot]) -> Result<VouchRiskReport> {
    let mut per_voucher = Vec::with_capacity(vouches.len());
    let mut total_percent = 0u32;
    let mut total_stars = 0u32;

    for vouch in vouches {
        if vouch.loan_id != loan.loan_id {
            return Err(KleoError::invalid_vouch(format!(
                "vouch by {} targets loan {}, expected {}",
                vouch.voucher, vouch.loan_id, loan.loan_id
            )));
        }
        if vouch.capital_percent > 100 {
            return Err(KleoError::invalid_vouch(format!(
                "vouch by {} has capital percent {}",
                vouch.voucher, vouch.capital_percent
            )));
        }

        let capital_at_risk =
            math::mul_div(loan.principal, vouch.capital_percent as u128, 100)
                .map_err(KleoError::Math)?;

        if vouch.status == VouchStatus::Active {
            total_percent += vouch.capital_percent as u32;
            total_stars = total_stars.saturating_add(vouch.stars_staked);
        }

        per_voucher.push(VoucherRisk {
            voucher: vouch.voucher,
            capital_at_risk,
            capital_percent: vouch.capital_percent,
            reputation_at_risk: vouch.stars_staked,
            status: vouch.status,
        });
    }

    if total_percent > 100 {
        warn!(
            loan_id = loan.loan_id,
            total_percent,
            "vouch capital exceeds principal"
        );
        return Err(KleoError::inconsistent(format!(
            "loan {}: committed vouch capital {}% exceeds principal",
            loan.loan_id, total_percent
        )));
    }
    let total_capital = math::mul_div(loan.principal, total_percent as u128, 100)
        .map_err(KleoError::Math)?;

    Ok(VouchRiskReport {
        per_voucher,
        total_capital_committed: total_capital,
        total_capital_percent: total_percent,
        total_stars_staked: total_stars,
    })
}

/// Share of a voucher's total capital concentrated in one loan, in basis
/// points. Used to warn a user stacking risk on a single borrower.
pub fn exposure_percent(capital_at_risk: u128, voucher_total_capital: u128) -> Result<u32> {
    if voucher_total_capital == 0 {
        return Err(kleo_common::MathError::DivisionByZero.into());
    }
    let bps = math::mul_div(
        capital_at_risk,
        BPS_DENOMINATOR as u128,
        voucher_total_capital,
    )
    .map_err(KleoError::Math)?;
    Ok(bps.min(u32::MAX as u128) as u32)
}
