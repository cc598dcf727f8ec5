//! Invariants of the synthesized market data.

use crate::market::{self, BOOK_DEPTH, HISTORY_DAYS, TRADE_COUNT};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn snapshot(seed: u64, price: f64) -> market::MarketSnapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    market::synthesize_with(&mut rng, price)
}

#[test]
fn test_snapshot_dimensions() {
    let snap = snapshot(1, 1.25);
    assert_eq!(snap.history.len(), HISTORY_DAYS);
    assert_eq!(snap.asks.len(), BOOK_DEPTH);
    assert_eq!(snap.bids.len(), BOOK_DEPTH);
    assert_eq!(snap.trades.len(), TRADE_COUNT);
}

#[test]
fn test_asks_ascend_and_bids_descend() {
    for seed in 0..20 {
        let snap = snapshot(seed, 1.25);
        for pair in snap.asks.windows(2) {
            assert!(pair[0].price <= pair[1].price, "asks out of order");
        }
        for pair in snap.bids.windows(2) {
            assert!(pair[0].price >= pair[1].price, "bids out of order");
        }
    }
}

#[test]
fn test_book_straddles_current_price() {
    for seed in 0..20 {
        let snap = snapshot(seed, 2.0);
        assert!(snap.asks[0].price > 2.0);
        assert!(snap.bids[0].price < 2.0);
    }
}

#[test]
fn test_prices_never_negative() {
    for seed in 0..20 {
        let snap = snapshot(seed, 0.01);
        assert!(snap.history.iter().all(|p| *p >= 0.0));
        assert!(snap.bids.iter().all(|l| l.price >= 0.0));
    }
}

#[test]
fn test_level_totals_match_price_times_size() {
    let snap = snapshot(3, 1.25);
    for level in snap.asks.iter().chain(snap.bids.iter()) {
        assert!((level.total - level.price * level.size as f64).abs() < 1e-9);
    }
    for trade in &snap.trades {
        assert!((trade.value - trade.price * trade.size as f64).abs() < 1e-9);
    }
}

#[test]
fn test_same_seed_same_snapshot() {
    assert_eq!(snapshot(42, 1.25), snapshot(42, 1.25));
}

#[test]
fn test_validate_quantity() {
    assert_eq!(market::validate_quantity("100"), Ok(100.0));
    assert_eq!(market::validate_quantity(" 2.5 "), Ok(2.5));
    assert_eq!(
        market::validate_quantity("0"),
        Err("Quantity must be greater than zero".to_string())
    );
    assert_eq!(
        market::validate_quantity("-5"),
        Err("Quantity must be greater than zero".to_string())
    );
    assert_eq!(
        market::validate_quantity("abc"),
        Err("Enter a numeric quantity".to_string())
    );
    assert_eq!(
        market::validate_quantity(""),
        Err("Enter a numeric quantity".to_string())
    );
}
