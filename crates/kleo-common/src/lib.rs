//! # Kleo Common
//!
//! Shared types, errors, and scaled-integer math for the Kleo client core.
//!
//! ## Core Types
//!
//! - [`AccountId`]: canonical account identity across SS58 and H160 formats
//! - [`LoanSnapshot`] / [`VouchSnapshot`] / [`PoolSnapshot`] /
//!   [`ReputationSnapshot`]: read-only mirrors of on-chain ledger state
//! - [`KleoError`]: unified recoverable error taxonomy
//!
//! ## Math
//!
//! - [`math`]: overflow-checked scaled-integer arithmetic. No floating point
//!   is used anywhere in accounting; every monetary and rate value is an
//!   integer scaled by one of the documented denominators below.

pub mod account;
pub mod error;
pub mod math;
pub mod snapshot;

// Re-export commonly used types at crate root
pub use account::{AccountId, AccountIdError};
pub use error::{KleoError, MathError, Result};
pub use snapshot::{
    DepositSnapshot, LoanSnapshot, LoanStatus, PoolSnapshot, ReputationSnapshot, VouchSnapshot,
    VouchStatus,
};

/// Kleo client core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimals of loan-scale raw amounts
pub const LOAN_DECIMALS: u8 = 10;

/// Decimals of chain-scale raw amounts
pub const CHAIN_DECIMALS: u8 = 18;

/// Denominator of every rate value: a stored rate `r` denotes the fraction
/// `r / RATE_SCALE`, so `500_000_000` is 5% and `RATE_SCALE` itself is 100%.
/// Pool utilization uses the same scale.
pub const RATE_SCALE: u64 = 10_000_000_000;

/// Denominator for plain basis-point values (overdue penalty, exposure)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Seconds in a (non-leap) year, the interest accrual base
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Seconds in a day, used for due-date countdowns
pub const SECONDS_PER_DAY: u64 = 86_400;
