//! Loan lifecycle state machine - the client mirror of on-chain transitions
//!
//! ```text
//! Pending ──activate──▶ Active ──repay──▶ Repaid
//!                          │
//!                          └──check default──▶ Defaulted
//! ```
//!
//! The ledger owns these transitions; this mirror evaluates the same guards
//! so the UI can tell what is about to be possible and never renders a state
//! the chain would reject. A failed guard is a typed
//! [`GuardNotSatisfied`](kleo_common::KleoError::GuardNotSatisfied) result,
//! never a silent no-op and never an exception used for control flow.
//!
//! A Pending loan that never gathers enough vouches has no exit: the
//! contracts define no cancellation or funding timeout, so the mirror does
//! not invent one. Default detection is an explicit check any caller may
//! evaluate, not an automatic process.
//!
//! Vouches transition in lock-step with their loan's terminal transition:
//! Released on repayment, Slashed on default.

use tracing::debug;

use kleo_common::{
    math, KleoError, LoanSnapshot, LoanStatus, Result, VouchSnapshot, VouchStatus, LOAN_DECIMALS,
};

use crate::repayment;
use crate::tiers::TierTable;
use crate::vouch;

/// What a caller can do with a loan right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Nothing: terminal, or Pending with unmet guards
    None,
    /// All activation guards pass; funding can be released
    ReadyToActivate,
    /// Active with outstanding debt; repayments can be posted
    ReadyToRepay,
    /// Past due with outstanding debt; a default check would land
    Defaultable,
}

/// External policy inputs the contracts keep in configuration
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    pub tier_table: TierTable,
    /// Late-payment penalty, plain basis points
    pub penalty_rate_bps: u32,
    /// Extra time past the due date before a default check lands
    pub grace_period_seconds: u64,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            tier_table: TierTable::default(),
            penalty_rate_bps: 300,
            grace_period_seconds: 0,
        }
    }
}

/// Guard evaluation and mirrored transitions under one policy
#[derive(Debug, Clone, Default)]
pub struct LifecycleEngine {
    policy: LifecyclePolicy,
}

impl LifecycleEngine {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    /// Pending → Active guard: tier stars gate, full capital coverage, and
    /// the tier's voucher quorum.
    pub fn check_activation(
        &self,
        loan: &LoanSnapshot,
        vouches: &[VouchSnapshot],
        borrower_available_stars: u32,
    ) -> Result<()> {
        if loan.status != LoanStatus::Pending {
            return Err(KleoError::guard(format!(
                "loan {} is {}, not Pending",
                loan.loan_id, loan.status
            )));
        }

        let active_voucher_count = vouches
            .iter()
            .filter(|v| v.status == VouchStatus::Active)
            .count() as u32;
        // tier brackets are in whole tokens, principal is raw units
        let whole_tokens = math::scale_decimals(loan.principal, LOAN_DECIMALS, 0)?;
        let tier = self.policy.tier_table.check(
            whole_tokens,
            borrower_available_stars,
            active_voucher_count,
        )?;
        if !tier.eligible {
            debug!(loan_id = loan.loan_id, missing = tier.missing_stars, "stars gate failed");
            return Err(KleoError::guard(format!(
                "borrower is {} stars short of tier {}",
                tier.missing_stars, tier.requirements.tier
            )));
        }

        let risk = vouch::compute_vouch_risk(loan, vouches)?;
        if !risk.covers_principal(loan) {
            return Err(KleoError::guard(format!(
                "committed vouch capital {}% does not cover the principal",
                risk.total_capital_percent
            )));
        }
        if tier.vouchers_still_needed > 0 {
            return Err(KleoError::guard(format!(
                "{} more vouchers needed for tier {}",
                tier.vouchers_still_needed, tier.requirements.tier
            )));
        }
        Ok(())
    }

    /// Mirror the Pending → Active transition: `start_time` is set to the
    /// activation time (not creation time), which defines the due time.
    pub fn activate(
        &self,
        loan: &LoanSnapshot,
        vouches: &[VouchSnapshot],
        borrower_available_stars: u32,
        now: u64,
    ) -> Result<LoanSnapshot> {
        self.check_activation(loan, vouches, borrower_available_stars)?;
        let mut activated = loan.clone();
        activated.status = LoanStatus::Active;
        activated.start_time = now;
        Ok(activated)
    }

    /// Active → Repaid guard: the posted repayments clear the debt.
    pub fn check_repayment(&self, loan: &LoanSnapshot, now: u64) -> Result<()> {
        if loan.status != LoanStatus::Active {
            return Err(KleoError::guard(format!(
                "loan {} is {}, not Active",
                loan.loan_id, loan.status
            )));
        }
        let status =
            repayment::compute_repayment_status(loan, now, self.policy.penalty_rate_bps)?;
        if status.remaining_debt > 0 {
            return Err(KleoError::guard(format!(
                "loan {} still owes {}",
                loan.loan_id, status.remaining_debt
            )));
        }
        Ok(())
    }

    /// Mirror the Active → Repaid transition; Active vouches release.
    pub fn mark_repaid(
        &self,
        loan: &LoanSnapshot,
        vouches: &[VouchSnapshot],
        now: u64,
    ) -> Result<(LoanSnapshot, Vec<VouchSnapshot>)> {
        self.check_repayment(loan, now)?;
        let mut repaid = loan.clone();
        repaid.status = LoanStatus::Repaid;
        Ok((repaid, settle_vouches(vouches, VouchStatus::Released)))
    }

    /// Active → Defaulted predicate: past due (plus grace) with debt
    /// outstanding. Pure; any caller may evaluate it, and nothing happens
    /// until someone acts on it.
    pub fn is_defaultable(&self, loan: &LoanSnapshot, now: u64) -> Result<bool> {
        if loan.status != LoanStatus::Active {
            return Ok(false);
        }
        let due = match loan.due_time() {
            Some(due) => due,
            None => return Ok(false),
        };
        if now <= due.saturating_add(self.policy.grace_period_seconds) {
            return Ok(false);
        }
        let status =
            repayment::compute_repayment_status(loan, now, self.policy.penalty_rate_bps)?;
        Ok(status.remaining_debt > 0)
    }

    /// Mirror the Active → Defaulted transition; Active vouches slash.
    pub fn mark_defaulted(
        &self,
        loan: &LoanSnapshot,
        vouches: &[VouchSnapshot],
        now: u64,
    ) -> Result<(LoanSnapshot, Vec<VouchSnapshot>)> {
        if !self.is_defaultable(loan, now)? {
            return Err(KleoError::guard(format!(
                "loan {} is not defaultable at {}",
                loan.loan_id, now
            )));
        }
        let mut defaulted = loan.clone();
        defaulted.status = LoanStatus::Defaulted;
        Ok((defaulted, settle_vouches(vouches, VouchStatus::Slashed)))
    }

    /// The one action currently available for this loan, if any.
    pub fn next_action(
        &self,
        loan: &LoanSnapshot,
        vouches: &[VouchSnapshot],
        borrower_available_stars: u32,
        now: u64,
    ) -> Result<LifecycleAction> {
        match loan.status {
            LoanStatus::Pending => {
                match self.check_activation(loan, vouches, borrower_available_stars) {
                    Ok(()) => Ok(LifecycleAction::ReadyToActivate),
                    Err(KleoError::GuardNotSatisfied { .. }) => Ok(LifecycleAction::None),
                    Err(other) => Err(other),
                }
            }
            LoanStatus::Active => {
                if self.is_defaultable(loan, now)? {
                    Ok(LifecycleAction::Defaultable)
                } else {
                    let status = repayment::compute_repayment_status(
                        loan,
                        now,
                        self.policy.penalty_rate_bps,
                    )?;
                    if status.remaining_debt > 0 {
                        Ok(LifecycleAction::ReadyToRepay)
                    } else {
                        Ok(LifecycleAction::None)
                    }
                }
            }
            LoanStatus::Repaid | LoanStatus::Defaulted => Ok(LifecycleAction::None),
        }
    }
}

fn settle_vouches(vouches: &[VouchSnapshot], terminal: VouchStatus) -> Vec<VouchSnapshot> {
    vouches
        .iter()
        .map(|v| {
            let mut settled = v.clone();
            if settled.status == VouchStatus::Active {
                settled.status = terminal;
            }
            settled
        })
        .collect()
}
