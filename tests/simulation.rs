use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Once;
use tradesim::{
    run_batch, simulate_baseline, simulate_risk_managed, CostModel, ExitReason, PricedSignalRecord,
    RiskConfig, Signal, SimulationVariant,
};

const TOLERANCE: f64 = 1e-12;

fn ensure_test_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap()
}

fn record(instrument_id: &str, day: i64, price: f64, signal: u8) -> PricedSignalRecord {
    PricedSignalRecord {
        instrument_id: instrument_id.to_string(),
        timestamp: start_date() + Duration::days(day),
        price,
        signal: Signal::from_binary(signal as i64).unwrap(),
        fundamental_indicator: None,
    }
}

/// Deterministic random walk with quarterly-style signals: prices stay
/// positive, timestamps strictly increase.
fn random_series(instrument_id: &str, length: usize, seed: u64) -> Vec<PricedSignalRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price: f64 = 100.0;
    (0..length)
        .map(|day| {
            price = (price * (1.0 + rng.gen_range(-0.08..0.08))).max(1.0);
            record(
                instrument_id,
                day as i64,
                price,
                if rng.gen_bool(0.5) { 1 } else { 0 },
            )
        })
        .collect()
}

fn price_by_timestamp(records: &[PricedSignalRecord]) -> HashMap<DateTime<Utc>, f64> {
    records
        .iter()
        .map(|record| (record.timestamp, record.price))
        .collect()
}

#[test]
fn baseline_random_walk_satisfies_trade_invariants() {
    ensure_test_env();
    let cost = CostModel::new(0.001, 0.0005);
    let records = random_series("RAND", 250, 7);
    let prices = price_by_timestamp(&records);

    let trades = simulate_baseline(&records, &cost).unwrap();

    let mut previous_exit: Option<DateTime<Utc>> = None;
    for trade in &trades {
        // Positions never overlap and exits never precede entries.
        assert!(trade.exit_timestamp >= trade.entry_timestamp);
        if let Some(previous) = previous_exit {
            assert!(trade.entry_timestamp >= previous);
        }
        previous_exit = Some(trade.exit_timestamp);

        // The return formula holds exactly against the recorded prices.
        let entry_price = prices[&trade.entry_timestamp];
        let exit_price = prices[&trade.exit_timestamp];
        let expected = exit_price / entry_price - 1.0 - cost.round_trip_friction();
        assert!((trade.net_return - expected).abs() < TOLERANCE);

        // Baseline trades carry none of the risk-managed fields.
        assert!(trade.position_size.is_none());
        assert!(trade.periods_held.is_none());
        assert!(trade.exit_reason.is_none());
    }

    // If the series ends bullish while a position is open, it was closed on
    // the final record rather than dropped.
    if records.last().unwrap().signal.is_bullish() {
        assert_eq!(
            trades.last().map(|trade| trade.exit_timestamp),
            Some(records.last().unwrap().timestamp)
        );
    }
}

#[test]
fn risk_managed_random_walk_satisfies_trade_invariants() {
    ensure_test_env();
    let config = RiskConfig {
        cost: CostModel::new(0.001, 0.001),
        ..RiskConfig::default()
    };
    let records = random_series("RAND", 250, 11);
    let prices = price_by_timestamp(&records);

    let trades = simulate_risk_managed(&records, &config).unwrap();
    assert!(!trades.is_empty());

    let mut previous_exit: Option<DateTime<Utc>> = None;
    for trade in &trades {
        assert!(trade.exit_timestamp >= trade.entry_timestamp);
        if let Some(previous) = previous_exit {
            assert!(trade.entry_timestamp >= previous);
        }
        previous_exit = Some(trade.exit_timestamp);

        let entry_price = prices[&trade.entry_timestamp];
        let exit_price = prices[&trade.exit_timestamp];
        let expected = exit_price / entry_price - 1.0 - config.cost.round_trip_friction();
        assert!((trade.net_return - expected).abs() < TOLERANCE);

        // Every risk-managed close names its reason and its hold counter,
        // and the hold backstop is never exceeded.
        let reason = trade.exit_reason.expect("risk-managed trades carry a reason");
        let periods_held = trade.periods_held.expect("risk-managed trades carry a counter");
        assert!(periods_held >= 1);
        if reason != ExitReason::EndOfData {
            assert!(periods_held <= config.max_hold_periods);
        }
        assert!(trade.position_size.is_some());
    }

    // Only the last trade may be an end-of-data close.
    for trade in trades.iter().take(trades.len() - 1) {
        assert_ne!(trade.exit_reason, Some(ExitReason::EndOfData));
    }
}

#[test]
fn batch_run_matches_per_instrument_simulations() {
    ensure_test_env();
    let config = RiskConfig::default();
    let alpha = random_series("ALPHA", 120, 3);
    let beta = random_series("BETA", 120, 5);

    let mut interleaved = Vec::new();
    for (a, b) in alpha.iter().zip(beta.iter()) {
        interleaved.push(a.clone());
        interleaved.push(b.clone());
    }

    let runs = run_batch(
        &interleaved,
        &SimulationVariant::RiskManaged(config.clone()),
    );
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].instrument_id, "ALPHA");
    assert_eq!(runs[1].instrument_id, "BETA");

    let alpha_direct = simulate_risk_managed(&alpha, &config).unwrap();
    let beta_direct = simulate_risk_managed(&beta, &config).unwrap();
    let alpha_batch = runs[0].outcome.as_ref().unwrap();
    let beta_batch = runs[1].outcome.as_ref().unwrap();

    assert_eq!(alpha_batch.len(), alpha_direct.len());
    assert_eq!(beta_batch.len(), beta_direct.len());
    for (from_batch, direct) in alpha_batch.iter().zip(alpha_direct.iter()) {
        assert_eq!(from_batch.entry_timestamp, direct.entry_timestamp);
        assert_eq!(from_batch.exit_timestamp, direct.exit_timestamp);
        assert!((from_batch.net_return - direct.net_return).abs() < TOLERANCE);
        assert_eq!(from_batch.exit_reason, direct.exit_reason);
    }
}

#[test]
fn malformed_instrument_does_not_abort_the_batch() {
    ensure_test_env();
    let mut bad = random_series("BAD", 20, 13);
    bad[10].timestamp = bad[9].timestamp - Duration::days(3);
    let good = random_series("GOOD", 20, 17);

    let mut records = bad;
    records.extend(good.clone());

    let runs = run_batch(&records, &SimulationVariant::Baseline(CostModel::default()));
    assert_eq!(runs.len(), 2);
    assert!(runs[0].outcome.is_err());

    let expected = simulate_baseline(&good, &CostModel::default()).unwrap();
    assert_eq!(runs[1].outcome.as_ref().unwrap().len(), expected.len());
}
