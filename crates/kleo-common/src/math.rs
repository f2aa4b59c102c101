//! Scaled-integer arithmetic for amounts, rates, and percentages
//!
//! Every monetary value in the core is a non-negative `u128` scaled by a
//! fixed denominator (see the constants in the crate root). Overflow policy:
//! **reject**, never saturate — a saturated money figure is a wrong money
//! figure. Division truncates toward zero, matching on-chain integer math.

use crate::error::MathError;
use crate::BPS_DENOMINATOR;

type MathResult<T> = std::result::Result<T, MathError>;

/// `a * b / divisor` with full overflow checking.
///
/// The intermediate product is computed in `u128`; inputs whose product
/// exceeds `u128::MAX` are rejected with [`MathError::ArithmeticOverflow`].
pub fn mul_div(a: u128, b: u128, divisor: u128) -> MathResult<u128> {
    if divisor == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(MathError::ArithmeticOverflow)?;
    Ok(product / divisor)
}

/// Basis-point share of an amount: `amount * bps / 10_000`.
pub fn percentage_of(amount: u128, bps: u32) -> MathResult<u128> {
    mul_div(amount, bps as u128, BPS_DENOMINATOR as u128)
}

/// Re-scale a raw amount between token decimal bases.
///
/// Scaling up multiplies and can overflow (rejected); scaling down truncates,
/// which loses sub-unit dust exactly the way the chain does.
pub fn scale_decimals(amount: u128, from_decimals: u8, to_decimals: u8) -> MathResult<u128> {
    if from_decimals == to_decimals {
        return Ok(amount);
    }
    if to_decimals > from_decimals {
        let factor = pow10(to_decimals - from_decimals)?;
        amount.checked_mul(factor).ok_or(MathError::ArithmeticOverflow)
    } else {
        let factor = pow10(from_decimals - to_decimals)?;
        Ok(amount / factor)
    }
}

/// Checked addition for running totals
pub fn checked_add(a: u128, b: u128) -> MathResult<u128> {
    a.checked_add(b).ok_or(MathError::ArithmeticOverflow)
}

fn pow10(exp: u8) -> MathResult<u128> {
    // u128 holds up to 10^38
    if exp > 38 {
        return Err(MathError::ArithmeticOverflow);
    }
    Ok(10u128.pow(exp as u32))
}
