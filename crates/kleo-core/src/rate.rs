//! Interest rate model - two-slope utilization curve
//!
//! The pool charges borrowers a rate that rises gently while liquidity is
//! plentiful and steeply once utilization passes the pool's optimal point
//! (the "kink"):
//!
//! - `u ≤ optimal`: `rate = base + slope1 · u / optimal`
//! - `u > optimal`: `rate = base + slope1 + slope2 · (u − optimal) / (1 − optimal)`
//!
//! The result is clamped to `[base, max_rate]`. An optional promotional
//! boost is added after the curve and remains subject to the `max_rate`
//! cap; where the policy flag comes from is the caller's concern.
//!
//! Loans do NOT reprice with this curve after activation — a loan's rate is
//! fixed at origination (see [`crate::repayment`]).

use kleo_common::{math, KleoError, PoolSnapshot, Result, RATE_SCALE};

/// Current borrow rate for a pool, on the rate scale (`RATE_SCALE` = 100%).
///
/// `boosted` applies the pool's promotional boost. Utilization above 100%
/// (a data error) is clamped to 100% before curve evaluation; an empty pool
/// prices at `base`.
pub fn current_rate(pool: &PoolSnapshot, boosted: bool) -> Result<u64> {
    let utilization = pool.utilization()?;
    rate_at_utilization(pool, utilization, boosted)
}

/// Curve evaluation at an explicit utilization, for previews ("what happens
/// to the rate if I borrow this much").
pub fn rate_at_utilization(pool: &PoolSnapshot, utilization: u64, boosted: bool) -> Result<u64> {
    let u = utilization.min(RATE_SCALE) as u128;
    let optimal = pool.optimal_utilization.min(RATE_SCALE) as u128;
    let base = pool.base_rate as u128;
    let slope1 = pool.slope1 as u128;
    let slope2 = pool.slope2 as u128;

    let curve = if u <= optimal {
        if optimal == 0 {
            // Degenerate kink at zero: first slope fully applied
            checked(base + slope1)?
        } else {
            let first = math::mul_div(slope1, u, optimal).map_err(KleoError::Math)?;
            checked(base + first)?
        }
    } else {
        // u > optimal implies optimal < RATE_SCALE, so the denominator
        // below is nonzero
        let excess = u - optimal;
        let span = RATE_SCALE as u128 - optimal;
        let second = math::mul_div(slope2, excess, span).map_err(KleoError::Math)?;
        checked(base + slope1 + second)?
    };

    // Not `clamp`: a misconfigured pool with base > max must cap, not panic
    let mut rate = curve
        .max(pool.base_rate as u128)
        .min(pool.max_rate as u128);
    if boosted {
        rate = checked(rate + pool.boost as u128)?.min(pool.max_rate as u128);
    }
    Ok(rate as u64)
}

fn checked(rate: u128) -> Result<u128> {
    if rate > u64::MAX as u128 {
        return Err(kleo_common::MathError::ArithmeticOverflow.into());
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Percent expressed on the rate scale
    fn pct(p: u64) -> u64 {
        p * RATE_SCALE / 100
    }

    fn pool(borrowed: u128, liquidity: u128) -> PoolSnapshot {
        PoolSnapshot {
            total_liquidity: liquidity,
            total_borrowed: borrowed,
            base_rate: pct(2),
            slope1: pct(4),
            slope2: pct(60),
            optimal_utilization: pct(80),
            max_rate: pct(100),
            boost: pct(1),
            min_stars_to_vouch: 0,
            reserve_factor_pct: 0,
            cooldown_period_seconds: 0,
        }
    }

    #[test]
    fn test_rate_below_kink() {
        // base 2% + slope1 4% * (40/80) = 4%
        let p = pool(400, 1_000);
        assert_eq!(current_rate(&p, false).unwrap(), pct(4));
    }

    #[test]
    fn test_rate_above_kink() {
        // 2% + 4% + 60% * (90-80)/20 = 36%
        let p = pool(900, 1_000);
        assert_eq!(current_rate(&p, false).unwrap(), pct(36));
    }

    #[test]
    fn test_rate_at_zero_utilization_is_base() {
        let p = pool(0, 1_000);
        assert_eq!(current_rate(&p, false).unwrap(), pct(2));
    }

    #[test]
    fn test_rate_at_full_utilization() {
        // 2% + 4% + 60% = 66%, under the 100% cap
        let p = pool(1_000, 1_000);
        assert_eq!(current_rate(&p, false).unwrap(), pct(66));
    }

    #[test]
    fn test_rate_clamped_to_max() {
        let mut p = pool(1_000, 1_000);
        p.max_rate = pct(30);
        assert_eq!(current_rate(&p, false).unwrap(), pct(30));
    }

    #[test]
    fn test_empty_pool_prices_at_base() {
        let p = pool(0, 0);
        assert_eq!(current_rate(&p, false).unwrap(), pct(2));
    }

    #[test]
    fn test_boost_is_additive_and_capped() {
        let p = pool(400, 1_000);
        assert_eq!(current_rate(&p, true).unwrap(), pct(5)); // 4% + 1%

        let mut capped = pool(1_000, 1_000);
        capped.max_rate = pct(66);
        assert_eq!(current_rate(&capped, true).unwrap(), pct(66));
    }

    #[test]
    fn test_overutilized_pool_clamps_to_full() {
        let p = pool(1_500, 1_000);
        assert_eq!(
            current_rate(&p, false).unwrap(),
            current_rate(&pool(1_000, 1_000), false).unwrap()
        );
    }

    #[test]
    fn test_degenerate_kink_at_zero() {
        let mut p = pool(500, 1_000);
        p.optimal_utilization = 0;
        // pinned start at base + slope1, plus the second slope's share
        let rate = current_rate(&p, false).unwrap();
        assert!(rate >= pct(6));
    }

    #[test]
    fn test_kink_at_one_never_divides_by_zero() {
        let mut p = pool(1_000, 1_000);
        p.optimal_utilization = RATE_SCALE;
        // whole range falls on the first slope
        assert_eq!(current_rate(&p, false).unwrap(), pct(6));
    }

    #[test]
    fn test_rate_monotone_in_utilization() {
        let mut last = 0;
        for step in 0..=100 {
            let u = step * (RATE_SCALE / 100);
            let r = rate_at_utilization(&pool(0, 1_000), u, false).unwrap();
            assert!(r >= last, "rate decreased at u={u}");
            last = r;
        }
    }
}
