//! Loan tiers - amount brackets with reputation and voucher requirements
//!
//! Tiers determine what a borrower must bring for a given loan size. The
//! production table (whole tokens):
//!
//! - Tier 1: 0-50 tokens, 5 stars, 1 voucher
//! - Tier 2: 50-100 tokens, 20 stars, 2 vouchers
//! - Tier 3: 100-1000 tokens, 50 stars, 3 vouchers
//!
//! Brackets are half-open `[min, max)` except the top tier, which is closed
//! at its max; an amount above it cannot be financed by this mechanism at
//! all (`NoTierAvailable`). The table must partition its range with no gaps
//! or overlaps — a malformed table is rejected at construction, never
//! silently reordered.

use serde::{Deserialize, Serialize};

use kleo_common::{KleoError, Result};

/// Requirements of a single tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRequirements {
    pub tier: u8,
    pub min_tokens: u128,
    pub max_tokens: u128,
    pub min_stars: u32,
    pub min_vouchers: u32,
}

impl TierRequirements {
    pub fn describe(&self) -> String {
        format!(
            "Tier {}: {}-{} tokens, {} stars, {} vouchers",
            self.tier, self.min_tokens, self.max_tokens, self.min_stars, self.min_vouchers
        )
    }
}

/// Eligibility check result for one requested amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierResult {
    pub requirements: TierRequirements,
    pub missing_stars: u32,
    pub vouchers_still_needed: u32,
    /// Reputation gate only: vouchers accumulate over time, so their count
    /// is informational here and enforced by the activation guard
    pub eligible: bool,
}

/// A validated, ordered tier table covering `[0, max_supported_amount]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    tiers: Vec<TierRequirements>,
}

impl TierTable {
    /// Validate and build a table. Rows must be non-empty, each with
    /// `min < max`, starting at 0 and contiguous with no gaps or overlaps.
    pub fn new(tiers: Vec<TierRequirements>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(KleoError::InvalidTierTable {
                reason: "empty table".into(),
            });
        }
        let mut expected_min = 0u128;
        for row in &tiers {
            if row.min_tokens >= row.max_tokens {
                return Err(KleoError::InvalidTierTable {
                    reason: format!(
                        "tier {}: min {} must be below max {}",
                        row.tier, row.min_tokens, row.max_tokens
                    ),
                });
            }
            if row.min_tokens != expected_min {
                return Err(KleoError::InvalidTierTable {
                    reason: format!(
                        "tier {}: starts at {} but previous tier ends at {}",
                        row.tier, row.min_tokens, expected_min
                    ),
                });
            }
            expected_min = row.max_tokens;
        }
        Ok(Self { tiers })
    }

    /// The largest amount this mechanism can finance.
    pub fn max_supported_amount(&self) -> u128 {
        self.tiers.last().map(|t| t.max_tokens).unwrap_or(0)
    }

    /// All tiers in order, for UI display.
    pub fn all(&self) -> &[TierRequirements] {
        &self.tiers
    }

    /// The tier whose bracket contains `amount`.
    pub fn tier_for(&self, amount: u128) -> Result<TierRequirements> {
        let last = self.tiers.len() - 1;
        for (idx, row) in self.tiers.iter().enumerate() {
            let contained = if idx == last {
                amount >= row.min_tokens && amount <= row.max_tokens
            } else {
                amount >= row.min_tokens && amount < row.max_tokens
            };
            if contained {
                return Ok(*row);
            }
        }
        Err(KleoError::NoTierAvailable { amount })
    }

    /// Check a borrower against the tier for a requested amount.
    pub fn check(
        &self,
        amount: u128,
        available_stars: u32,
        current_voucher_count: u32,
    ) -> Result<TierResult> {
        let requirements = self.tier_for(amount)?;
        let missing_stars = requirements.min_stars.saturating_sub(available_stars);
        let vouchers_still_needed = requirements
            .min_vouchers
            .saturating_sub(current_voucher_count);
        Ok(TierResult {
            requirements,
            missing_stars,
            vouchers_still_needed,
            eligible: missing_stars == 0,
        })
    }
}

impl Default for TierTable {
    /// The production Kleo tier table, amounts in whole tokens.
    fn default() -> Self {
        Self::new(vec![
            TierRequirements {
                tier: 1,
                min_tokens: 0,
                max_tokens: 50,
                min_stars: 5,
                min_vouchers: 1,
            },
            TierRequirements {
                tier: 2,
                min_tokens: 50,
                max_tokens: 100,
                min_stars: 20,
                min_vouchers: 2,
            },
            TierRequirements {
                tier: 3,
                min_tokens: 100,
                max_tokens: 1_000,
                min_stars: 50,
                min_vouchers: 3,
            },
        ])
        .expect("default tier table is valid")
    }
}
