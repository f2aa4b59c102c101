//! Account-level aggregation across deposits, borrowings and vouches
//!
//! Dashboards want one number per concern, computed over snapshot data that
//! may be partially stale or malformed. A bad loan record must not blank the
//! whole page, so aggregation never fails as a whole: records that cannot be
//! priced are skipped from the monetary totals and reported as
//! [`PositionIssue`]s alongside the summary.

use std::collections::HashSet;

use tracing::warn;

use kleo_common::{
    DepositSnapshot, LoanSnapshot, LoanStatus, ReputationSnapshot, VouchSnapshot, VouchStatus,
    BPS_DENOMINATOR,
};

use crate::repayment;

/// One record the aggregation had to set aside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIssue {
    /// Loan the record belongs to, when attributable
    pub loan_id: Option<u64>,
    pub detail: String,
}

/// Everything a portfolio dashboard renders for one account
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortfolioSummary {
    pub total_deposits: u128,
    /// Outstanding principal across Active borrowings
    pub total_borrowed: u128,
    /// Remaining debt (interest and any accrued penalty included) across
    /// Active borrowings
    pub total_to_repay: u128,
    /// Stars locked behind this account's Active vouches
    pub stars_at_stake: u64,
    pub active_loans_count: u32,
    pub completed_loans: u32,
    /// Every borrowing ever taken, terminal ones included
    pub total_loans: u32,
    /// `completed / total` in basis points; 0 when the account has no loans
    pub success_rate_bps: u32,
    /// Records excluded from the totals above
    pub issues: Vec<PositionIssue>,
}

/// Fold an account's raw snapshots into a [`PortfolioSummary`].
///
/// Only records belonging to `reputation.account` are counted; callers may
/// pass unfiltered query results. Duplicate vouches for the same
/// `(voucher, loan_id)` pair are indexer artifacts and counted once.
pub fn aggregate_position(
    deposits: &[DepositSnapshot],
    loans: &[LoanSnapshot],
    vouches: &[VouchSnapshot],
    reputation: &ReputationSnapshot,
    now: u64,
    penalty_rate_bps: u32,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for deposit in deposits {
        match summary.total_deposits.checked_add(deposit.amount) {
            Some(total) => summary.total_deposits = total,
            None => {
                summary.issues.push(PositionIssue {
                    loan_id: None,
                    detail: format!("deposit in pool {} overflows the total", deposit.pool_id),
                });
            }
        }
    }

    for loan in loans.iter().filter(|l| l.borrower == reputation.account) {
        summary.total_loans += 1;
        match loan.status {
            LoanStatus::Pending => {}
            LoanStatus::Repaid => summary.completed_loans += 1,
            LoanStatus::Defaulted => {}
            LoanStatus::Active => {
                summary.active_loans_count += 1;
                match repayment::compute_repayment_status(loan, now, penalty_rate_bps) {
                    Ok(status) => {
                        let folded = summary
                            .total_borrowed
                            .checked_add(loan.principal)
                            .and_then(|b| {
                                summary
                                    .total_to_repay
                                    .checked_add(status.remaining_debt)
                                    .map(|r| (b, r))
                            });
                        match folded {
                            Some((borrowed, to_repay)) => {
                                summary.total_borrowed = borrowed;
                                summary.total_to_repay = to_repay;
                            }
                            None => summary.issues.push(PositionIssue {
                                loan_id: Some(loan.loan_id),
                                detail: "loan amounts overflow the portfolio totals".into(),
                            }),
                        }
                    }
                    Err(err) => {
                        warn!(loan_id = loan.loan_id, %err, "loan excluded from portfolio");
                        summary.issues.push(PositionIssue {
                            loan_id: Some(loan.loan_id),
                            detail: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    let mut seen = HashSet::new();
    for v in vouches.iter().filter(|v| v.voucher == reputation.account) {
        if !seen.insert((v.voucher, v.loan_id)) {
            summary.issues.push(PositionIssue {
                loan_id: Some(v.loan_id),
                detail: "duplicate vouch record counted once".into(),
            });
            continue;
        }
        if v.status == VouchStatus::Active {
            summary.stars_at_stake += u64::from(v.stars_staked);
        }
    }

    if summary.total_loans > 0 {
        summary.success_rate_bps =
            summary.completed_loans * BPS_DENOMINATOR as u32 / summary.total_loans;
    }
    summary
}
