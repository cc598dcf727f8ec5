//! Demo market data for the trading view.
//!
//! Everything here is synthesized client-side from a single current price
//! with pseudo-random perturbation. There is no market feed behind it and
//! submitted orders go nowhere.

use rand::Rng;

pub const HISTORY_DAYS: usize = 31;
pub const BOOK_DEPTH: usize = 8;
pub const TRADE_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderLevel {
    pub price: f64,
    pub size: u32,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRecord {
    pub minutes_ago: u32,
    pub price: f64,
    pub size: u32,
    pub value: f64,
    pub is_buy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub history: Vec<f64>,
    pub asks: Vec<OrderLevel>,
    pub bids: Vec<OrderLevel>,
    pub trades: Vec<TradeRecord>,
}

pub fn synthesize(current_price: f64) -> MarketSnapshot {
    synthesize_with(&mut rand::thread_rng(), current_price)
}

pub fn synthesize_with<R: Rng>(rng: &mut R, current_price: f64) -> MarketSnapshot {
    MarketSnapshot {
        history: price_history(rng, current_price),
        asks: asks(rng, current_price),
        bids: bids(rng, current_price),
        trades: recent_trades(rng, current_price),
    }
}

/// Random walk with a slight upward drift, starting below the current price.
fn price_history<R: Rng>(rng: &mut R, base: f64) -> Vec<f64> {
    let mut price = base * 0.9;
    (0..HISTORY_DAYS)
        .map(|_| {
            let change = (rng.gen::<f64>() - 0.45) * 0.05 * base;
            price += change;
            price = price.max(0.0);
            price
        })
        .collect()
}

/// Sell side: ascending prices starting just above the current price.
fn asks<R: Rng>(rng: &mut R, current: f64) -> Vec<OrderLevel> {
    let mut price = current * 1.001;
    let mut levels: Vec<OrderLevel> = (0..BOOK_DEPTH)
        .map(|_| {
            price += rng.gen::<f64>() * 0.002 * current;
            let size = rng.gen_range(100..1100);
            OrderLevel {
                price,
                size,
                total: price * size as f64,
            }
        })
        .collect();
    levels.sort_by(|a, b| a.price.total_cmp(&b.price));
    levels
}

/// Buy side: descending prices starting just below the current price.
fn bids<R: Rng>(rng: &mut R, current: f64) -> Vec<OrderLevel> {
    let mut price = current * 0.999;
    let mut levels: Vec<OrderLevel> = (0..BOOK_DEPTH)
        .map(|_| {
            price -= rng.gen::<f64>() * 0.002 * current;
            price = price.max(0.0);
            let size = rng.gen_range(100..1100);
            OrderLevel {
                price,
                size,
                total: price * size as f64,
            }
        })
        .collect();
    levels.sort_by(|a, b| b.price.total_cmp(&a.price));
    levels
}

fn recent_trades<R: Rng>(rng: &mut R, current: f64) -> Vec<TradeRecord> {
    (0..TRADE_COUNT as u32)
        .map(|i| {
            let price = current + (rng.gen::<f64>() - 0.5) * 0.01 * current;
            let size = rng.gen_range(50..550);
            TradeRecord {
                minutes_ago: i * 2 + rng.gen_range(0..3),
                price,
                size,
                value: price * size as f64,
                is_buy: rng.gen_bool(0.5),
            }
        })
        .collect()
}

/// The only validation an order gets: a parseable, positive quantity.
pub fn validate_quantity(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(quantity) if quantity > 0.0 => Ok(quantity),
        Ok(_) => Err("Quantity must be greater than zero".to_string()),
        Err(_) => Err("Enter a numeric quantity".to_string()),
    }
}
