//! End-to-end loan flow over wire-shaped snapshot data
//!
//! Feeds indexer-style JSON through deserialization, tier checks, vouch
//! risk, activation, accrual, default detection and portfolio aggregation,
//! and asserts the figures stay mutually consistent at every step.

use serde_json::json;

use kleo_common::{
    DepositSnapshot, LoanSnapshot, LoanStatus, PoolSnapshot, ReputationSnapshot, VouchSnapshot,
    VouchStatus,
};
use kleo_core::{
    aggregate_position, compute_repayment_status, compute_vouch_risk, current_rate,
    LifecycleAction, LifecycleEngine, TierTable,
};

const DAY: u64 = 86_400;
const ACTIVATION: u64 = 1_700_000_000;
const PENALTY_BPS: u32 = 300;

fn wire_loan() -> LoanSnapshot {
    // Field names as the contract queries return them
    serde_json::from_value(json!({
        "loanId": 42,
        "borrower": "0xd43593c715fdd31c61141abd04a99fd6822c8558",
        "amount": "10000000000000",
        "interestRate": "500000000",
        "term": 7_776_000u64,
        "startTime": 0,
        "status": "Funding",
        "vouchers": [
            "0x1111111111111111111111111111111111111111",
            "0x2222222222222222222222222222222222222222",
            "0x3333333333333333333333333333333333333333"
        ],
        "amountRepaidSoFar": "0",
        "purpose": "0x496e76656e746f7279"
    }))
    .expect("loan snapshot should deserialize")
}

fn wire_vouches() -> Vec<VouchSnapshot> {
    serde_json::from_value(json!([
        {
            "voucher": "0x1111111111111111111111111111111111111111",
            "loanId": 42,
            "stakedStars": 30,
            "capitalPercent": 40,
            "status": "Active"
        },
        {
            "voucher": "0x2222222222222222222222222222222222222222",
            "loanId": 42,
            "stakedStars": 15,
            "capitalPercent": 35,
            "status": "Active"
        },
        {
            "voucher": "0x3333333333333333333333333333333333333333",
            "loanId": 42,
            "stakedStars": 10,
            "capitalPercent": 25,
            "status": "Active"
        }
    ]))
    .expect("vouch snapshots should deserialize")
}

fn pool() -> PoolSnapshot {
    serde_json::from_value(json!({
        "totalLiquidity": "100000000000000",
        "totalBorrowed": "40000000000000",
        "baseInterestRate": "200000000",
        "slope1": "400000000",
        "slope2": "6000000000",
        "optimalUtilization": "8000000000",
        "maxRate": "5000000000"
    }))
    .expect("pool snapshot should deserialize")
}

#[test]
fn pending_loan_activates_once_fully_vouched() {
    let loan = wire_loan();
    let vouches = wire_vouches();
    let engine = LifecycleEngine::default();

    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.principal, 10_000_000_000_000);
    assert_eq!(loan.purpose_text().as_deref(), Some("Inventory"));

    // 1000-token loan lands in the top tier: 50 stars, 3 vouchers
    let tier = TierTable::default().check(1_000, 60, 3).unwrap();
    assert_eq!(tier.requirements.tier, 3);
    assert!(tier.eligible);
    assert_eq!(tier.vouchers_still_needed, 0);

    let risk = compute_vouch_risk(&loan, &vouches).unwrap();
    assert_eq!(risk.total_capital_percent, 100);
    assert_eq!(risk.total_capital_committed, loan.principal);
    assert_eq!(risk.total_stars_staked, 55);
    assert!(risk.covers_principal(&loan));

    assert_eq!(
        engine.next_action(&loan, &vouches, 60, ACTIVATION).unwrap(),
        LifecycleAction::ReadyToActivate
    );
    let active = engine.activate(&loan, &vouches, 60, ACTIVATION).unwrap();
    assert_eq!(active.status, LoanStatus::Active);
    assert_eq!(active.due_time(), Some(ACTIVATION + 90 * DAY));
}

#[test]
fn activation_guard_rejects_partial_coverage() {
    let loan = wire_loan();
    let mut vouches = wire_vouches();
    vouches.pop();

    let engine = LifecycleEngine::default();
    assert!(engine.check_activation(&loan, &vouches, 60).is_err());
    assert_eq!(
        engine.next_action(&loan, &vouches, 60, ACTIVATION).unwrap(),
        LifecycleAction::None
    );
}

#[test]
fn accrual_and_default_over_the_term() {
    let engine = LifecycleEngine::default();
    let active = engine
        .activate(&wire_loan(), &wire_vouches(), 60, ACTIVATION)
        .unwrap();

    // 5% annual over 90 days on 1000 tokens
    let on_time = compute_repayment_status(&active, ACTIVATION + 30 * DAY, PENALTY_BPS).unwrap();
    assert_eq!(on_time.total_repayment, 10_000_000_000_000 + 123_287_671_232);
    assert_eq!(on_time.remaining_debt, on_time.total_repayment);
    assert!(!on_time.is_overdue);
    assert_eq!(on_time.days_remaining, 60);

    assert!(!engine.is_defaultable(&active, ACTIVATION + 90 * DAY).unwrap());
    assert!(engine.is_defaultable(&active, ACTIVATION + 91 * DAY).unwrap());

    // overdue adds the flat 3% penalty on principal
    let late = compute_repayment_status(&active, ACTIVATION + 91 * DAY, PENALTY_BPS).unwrap();
    assert_eq!(late.remaining_debt, on_time.remaining_debt + 300_000_000_000);
    assert!(late.is_overdue);

    let (defaulted, settled) = engine
        .mark_defaulted(&active, &wire_vouches(), ACTIVATION + 91 * DAY)
        .unwrap();
    assert_eq!(defaulted.status, LoanStatus::Defaulted);
    assert!(settled.iter().all(|v| v.status == VouchStatus::Slashed));
}

#[test]
fn repayment_releases_vouches() {
    let engine = LifecycleEngine::default();
    let mut active = engine
        .activate(&wire_loan(), &wire_vouches(), 60, ACTIVATION)
        .unwrap();

    let status = compute_repayment_status(&active, ACTIVATION + 45 * DAY, PENALTY_BPS).unwrap();
    active.amount_repaid = status.total_repayment;

    let (repaid, settled) = engine
        .mark_repaid(&active, &wire_vouches(), ACTIVATION + 45 * DAY)
        .unwrap();
    assert_eq!(repaid.status, LoanStatus::Repaid);
    assert!(settled.iter().all(|v| v.status == VouchStatus::Released));

    let cleared = compute_repayment_status(&repaid, ACTIVATION + 60 * DAY, PENALTY_BPS).unwrap();
    assert_eq!(cleared.remaining_debt, 0);
}

#[test]
fn borrower_portfolio_matches_loan_figures() {
    let engine = LifecycleEngine::default();
    let active = engine
        .activate(&wire_loan(), &wire_vouches(), 60, ACTIVATION)
        .unwrap();
    let now = ACTIVATION + 30 * DAY;

    let borrower = ReputationSnapshot {
        account: active.borrower,
        stars_total: 60,
        stars_at_stake: 0,
    };
    let deposits = [DepositSnapshot { pool_id: 0, amount: 2_000_000_000_000 }];

    let summary = aggregate_position(
        &deposits,
        &[active.clone()],
        &[],
        &borrower,
        now,
        PENALTY_BPS,
    );
    let status = compute_repayment_status(&active, now, PENALTY_BPS).unwrap();

    assert_eq!(summary.total_deposits, 2_000_000_000_000);
    assert_eq!(summary.total_borrowed, active.principal);
    assert_eq!(summary.total_to_repay, status.remaining_debt);
    assert_eq!(summary.active_loans_count, 1);
    assert_eq!(summary.success_rate_bps, 0);
    assert!(summary.issues.is_empty());
}

#[test]
fn voucher_portfolio_tracks_stars_at_stake() {
    let vouches = wire_vouches();
    let voucher = ReputationSnapshot {
        account: vouches[0].voucher,
        stars_total: 50,
        stars_at_stake: 30,
    };

    let summary = aggregate_position(&[], &[], &vouches, &voucher, ACTIVATION, PENALTY_BPS);
    assert_eq!(summary.stars_at_stake, 30);
    assert_eq!(summary.total_loans, 0);

    let risk = compute_vouch_risk(&wire_loan(), &vouches).unwrap();
    let mine = &risk.per_voucher[0];
    assert_eq!(mine.reputation_at_risk, 30);
    assert_eq!(mine.capital_at_risk, 4_000_000_000_000);
    assert_eq!(voucher.stars_available().unwrap(), 20);
}

#[test]
fn pool_rate_feeds_new_loans() {
    let pool = pool();
    // 40% utilization on a 2%/4%/60% curve below the 80% kink
    let rate = current_rate(&pool, false).unwrap();
    assert_eq!(rate, 400_000_000);
    assert_eq!(kleo_core::display::format_rate(rate), "4.00%");
}
