//! Read-only ledger snapshots
//!
//! The transport layer (out of scope) fetches per-entity state from the
//! contracts and hands it to the core as these serde-shaped snapshots. The
//! core never mutates them; every derived figure is recomputed from an
//! explicit snapshot plus an explicit `now`, so a single computation can
//! never tear across two reads.
//!
//! Legacy wire quirks are absorbed here once: lowercase/renamed status
//! strings are normalized through serde aliases, balances arrive as JSON
//! numbers or as decimal strings (indexers stringify bigints), and loan
//! purposes arrive either as plain text or hex-encoded UTF-8 bytes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::account::AccountId;
use crate::error::{KleoError, Result};
use crate::math;
use crate::RATE_SCALE;

/// Deserializers for amounts that arrive as numbers or decimal strings
mod wire {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr<T> {
        Num(T),
        Str(String),
    }

    pub fn amount<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match NumOrStr::<T>::deserialize(deserializer)? {
            NumOrStr::Num(n) => Ok(n),
            NumOrStr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn opt_amount<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match Option::<NumOrStr<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumOrStr::Num(n)) => Ok(Some(n)),
            Some(NumOrStr::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Lifecycle status of a loan as mirrored from the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Created, accumulating vouches; `start_time` is still 0
    #[serde(alias = "pending", alias = "Funding", alias = "funding")]
    Pending,
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "repaid", alias = "Completed", alias = "completed")]
    Repaid,
    #[serde(alias = "defaulted")]
    Defaulted,
}

impl LoanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Repaid | LoanStatus::Defaulted)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Pending => write!(f, "Pending"),
            LoanStatus::Active => write!(f, "Active"),
            LoanStatus::Repaid => write!(f, "Repaid"),
            LoanStatus::Defaulted => write!(f, "Defaulted"),
        }
    }
}

/// Status of a vouch, lock-stepped with its loan's terminal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VouchStatus {
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "released")]
    Released,
    #[serde(alias = "slashed")]
    Slashed,
}

/// One loan as read from the ledger
///
/// Amounts are 10-decimal raw units; `interest_rate` is fixed at origination
/// on the [`RATE_SCALE`](crate::RATE_SCALE) and does not reprice afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSnapshot {
    pub loan_id: u64,
    pub borrower: AccountId,
    #[serde(alias = "amount", deserialize_with = "wire::amount")]
    pub principal: u128,
    #[serde(deserialize_with = "wire::amount")]
    pub interest_rate: u64,
    #[serde(alias = "term", deserialize_with = "wire::amount")]
    pub term_seconds: u64,
    /// 0 while Pending; set exactly once at activation
    #[serde(default, deserialize_with = "wire::amount")]
    pub start_time: u64,
    pub status: LoanStatus,
    #[serde(default)]
    pub vouchers: Vec<AccountId>,
    /// Authoritative figure when the contract exposes it; otherwise the
    /// repayment calculator derives it locally
    #[serde(default, deserialize_with = "wire::opt_amount")]
    pub total_repayment_amount: Option<u128>,
    /// Running total of partial repayments posted so far
    #[serde(default, alias = "amountRepaidSoFar", deserialize_with = "wire::amount")]
    pub amount_repaid: u128,
    /// Free-form purpose, plain text or hex-encoded UTF-8
    #[serde(default)]
    pub purpose: Option<String>,
}

impl LoanSnapshot {
    /// `start_time + term`, defined only once the loan is Active or later.
    ///
    /// Invariant: `status == Pending ⇔ start_time == 0`.
    pub fn due_time(&self) -> Option<u64> {
        if self.status == LoanStatus::Pending || self.start_time == 0 {
            return None;
        }
        self.start_time.checked_add(self.term_seconds)
    }

    /// Decode the purpose to display text.
    pub fn purpose_text(&self) -> Option<String> {
        let raw = self.purpose.as_deref()?;
        if let Some(stripped) = raw.strip_prefix("0x") {
            if let Ok(bytes) = hex::decode(stripped) {
                if let Ok(text) = String::from_utf8(bytes) {
                    return Some(text);
                }
            }
            // Undecodable hex stays as-is rather than vanishing
            return Some(raw.to_string());
        }
        Some(raw.to_string())
    }

    /// Validate the Pending ⇔ start_time == 0 invariant.
    pub fn check_integrity(&self) -> Result<()> {
        let pending = self.status == LoanStatus::Pending;
        if pending != (self.start_time == 0) {
            return Err(KleoError::inconsistent(format!(
                "loan {}: status {} with start_time {}",
                self.loan_id, self.status, self.start_time
            )));
        }
        Ok(())
    }
}

/// One vouch as read from the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VouchSnapshot {
    pub voucher: AccountId,
    pub loan_id: u64,
    #[serde(alias = "stakedStars")]
    pub stars_staked: u32,
    /// Percent of the loan's principal this voucher capital-backs, 0-100
    pub capital_percent: u8,
    pub status: VouchStatus,
}

/// One liquidity pool as read from the ledger
///
/// Curve parameters share the rate scale; policy parameters feed eligibility
/// and (out-of-scope) withdrawal guards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    #[serde(deserialize_with = "wire::amount")]
    pub total_liquidity: u128,
    #[serde(deserialize_with = "wire::amount")]
    pub total_borrowed: u128,
    #[serde(alias = "baseInterestRate", deserialize_with = "wire::amount")]
    pub base_rate: u64,
    #[serde(deserialize_with = "wire::amount")]
    pub slope1: u64,
    #[serde(deserialize_with = "wire::amount")]
    pub slope2: u64,
    #[serde(deserialize_with = "wire::amount")]
    pub optimal_utilization: u64,
    #[serde(deserialize_with = "wire::amount")]
    pub max_rate: u64,
    #[serde(default, deserialize_with = "wire::amount")]
    pub boost: u64,
    #[serde(default)]
    pub min_stars_to_vouch: u32,
    #[serde(default)]
    pub reserve_factor_pct: u8,
    #[serde(default)]
    pub cooldown_period_seconds: u64,
}

impl PoolSnapshot {
    /// `total_liquidity − total_borrowed`; borrowed exceeding liquidity is a
    /// data-integrity error, not a valid state.
    pub fn available_liquidity(&self) -> Result<u128> {
        self.total_liquidity
            .checked_sub(self.total_borrowed)
            .ok_or_else(|| {
                KleoError::inconsistent(format!(
                    "pool borrowed {} exceeds liquidity {}",
                    self.total_borrowed, self.total_liquidity
                ))
            })
    }

    /// Utilization fraction on the rate scale (`RATE_SCALE` = 100%).
    ///
    /// 0 when the pool is empty. Values above 100% are clamped before curve
    /// evaluation (with a warning); the un-clamped condition is still
    /// reportable through [`available_liquidity`](Self::available_liquidity).
    pub fn utilization(&self) -> Result<u64> {
        if self.total_liquidity == 0 {
            return Ok(0);
        }
        let raw = math::mul_div(
            self.total_borrowed,
            RATE_SCALE as u128,
            self.total_liquidity,
        )?;
        if raw > RATE_SCALE as u128 {
            warn!(
                borrowed = self.total_borrowed,
                liquidity = self.total_liquidity,
                "pool utilization above 100%, clamping"
            );
            return Ok(RATE_SCALE);
        }
        Ok(raw as u64)
    }
}

/// One account's reputation as read from the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationSnapshot {
    pub account: AccountId,
    #[serde(alias = "stars")]
    pub stars_total: u32,
    #[serde(default)]
    pub stars_at_stake: u32,
}

impl ReputationSnapshot {
    /// Stars free to stake on new vouches: `total − at_stake`.
    ///
    /// At-stake exceeding total means the mirror diverged from the ledger.
    pub fn stars_available(&self) -> Result<u32> {
        self.stars_total
            .checked_sub(self.stars_at_stake)
            .ok_or_else(|| {
                KleoError::inconsistent(format!(
                    "stars at stake {} exceed total {} for {}",
                    self.stars_at_stake, self.stars_total, self.account
                ))
            })
    }

    /// Reputation gate for vouching in a pool.
    pub fn can_vouch(&self, pool: &PoolSnapshot) -> Result<bool> {
        Ok(self.stars_available()? >= pool.min_stars_to_vouch)
    }
}

/// One lender deposit position, consumed by the portfolio aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositSnapshot {
    pub pool_id: u64,
    #[serde(deserialize_with = "wire::amount")]
    pub amount: u128,
}
