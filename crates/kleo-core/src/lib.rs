//! # Kleo Core
//!
//! Client-side reconstruction of the Kleo lending protocol's loan lifecycle
//! and risk-accounting model. Settlement executes in on-chain contracts out
//! of this crate's reach; everything here is a pure derivation over read-only
//! ledger snapshots, threaded with an explicit `now`, so the figures a UI
//! shows (amounts owed, rates, tier eligibility, exposure, default status)
//! are deterministic and mutually consistent.
//!
//! ## Components
//!
//! - [`rate`]: utilization-driven two-slope interest curve
//! - [`repayment`]: interest accrual and remaining-debt arithmetic
//! - [`tiers`]: amount-bracketed reputation/voucher requirements
//! - [`vouch`]: per-voucher capital and reputation at risk
//! - [`lifecycle`]: guarded Pending → Active → {Repaid, Defaulted} mirror
//! - [`portfolio`]: per-account position aggregation
//! - [`display`]: the one place floating point is allowed (UI formatting)

pub mod display;
pub mod lifecycle;
pub mod portfolio;
pub mod rate;
pub mod repayment;
pub mod tiers;
pub mod vouch;

// Re-export the caller-facing surface at crate root
pub use lifecycle::{LifecycleAction, LifecycleEngine, LifecyclePolicy};
pub use portfolio::{aggregate_position, PortfolioSummary, PositionIssue};
pub use rate::current_rate;
pub use repayment::{compute_repayment_status, RepaymentStatus};
pub use tiers::{TierRequirements, TierResult, TierTable};
pub use vouch::{compute_vouch_risk, exposure_percent, VouchRiskReport, VoucherRisk};
