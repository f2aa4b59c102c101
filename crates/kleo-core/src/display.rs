//! Human-readable formatting for UI surfaces
//!
//! The only module allowed to touch floating point: everything here produces
//! display strings, never values that feed back into accounting. Callers keep
//! the fixed-point integers and format at the last possible moment.

use chrono::{DateTime, Utc};

use kleo_common::{AccountId, RATE_SCALE};

/// Token balance in its smallest unit, rendered to at most two decimals.
/// Amounts of a thousand tokens or more collapse to the `K` form
/// (`1_500 tokens` → `"1.5K"`).
pub fn format_balance(amount: u128, decimals: u8) -> String {
    let tokens = amount as f64 / 10f64.powi(i32::from(decimals));
    if tokens >= 1_000.0 {
        return format!("{:.1}K", tokens / 1_000.0);
    }
    trim_trailing_zeros(format!("{tokens:.2}"), 0)
}

/// Scaled annual rate (`5% == 500_000_000`) as a percentage with at least
/// two decimals: `"5.00%"`.
pub fn format_rate(rate: u64) -> String {
    let percent = rate as f64 / RATE_SCALE as f64 * 100.0;
    format!("{}%", trim_trailing_zeros(format!("{percent:.8}"), 2))
}

/// Utilization shares the rate scale, so it formats the same way.
pub fn format_utilization(utilization: u64) -> String {
    format_rate(utilization)
}

/// Unix timestamp (seconds) as `"Mar 5, 2026"`.
pub fn format_due_date(timestamp_secs: u64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp_secs as i64, 0) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "invalid date".to_string(),
    }
}

/// Shorten an address string for inline display: `0xd43593...2c8558`, with
/// 8 leading and 6 trailing characters kept.
pub fn format_address(address: &str) -> String {
    format_address_with(address, 8, 6)
}

pub fn format_address_with(address: &str, start: usize, end: usize) -> String {
    if address.len() <= start + end {
        return address.to_string();
    }
    format!("{}...{}", &address[..start], &address[address.len() - end..])
}

/// Canonical short form of an account id.
pub fn format_account(account: &AccountId) -> String {
    format_address(&account.to_string())
}

pub fn format_stars(stars: u32) -> String {
    format!("⭐ {stars}")
}

/// Drop trailing fraction zeros, keeping at least `min_fraction` digits.
fn trim_trailing_zeros(mut s: String, min_fraction: usize) -> String {
    if !s.contains('.') {
        return s;
    }
    while s.ends_with('0') {
        let fraction = s.len() - s.find('.').unwrap_or(0) - 1;
        if fraction <= min_fraction {
            break;
        }
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
