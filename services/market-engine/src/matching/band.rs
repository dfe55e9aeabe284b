//! Price-band matching algorithm
//!
//! Cross-matches bids against asks inside the admissible execution window
//! `[mid·(100−r)/100, mid·(100+r)/100]`. Priority is price, then submission
//! height, then a deterministic hash tag, so every replica fills the same
//! orders in the same sequence without relying on any map iteration order.
//!
//! The algorithm is pure: it never touches orders or balances itself and
//! drives all effects through the `DealExec` it is handed.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// One side's view of an order, as much as matching needs
#[derive(Debug, Clone)]
pub struct TradeCandidate {
    /// Order id in its stable string form
    pub id: String,
    pub price: Decimal,
    pub height: i64,
    /// Deterministic tie-break tag, see [`tie_break_hash`]
    pub hash: [u8; 32],
}

/// Effect handler the matcher drives
///
/// `available` is re-queried before every fill: a buyer whose escrow no
/// longer covers its remaining stock reports zero and is skipped for the
/// rest of the pass.
pub trait DealExec {
    fn available(&self, id: &str) -> i64;
    fn deal(&mut self, bid_id: &str, ask_id: &str, amount: i64, price: Decimal);
}

/// Deterministic tie-break tag for equal-priced, equal-height orders
///
/// `Sha256(order_id ‖ block_data_hash)`; mixing in the block data hash keeps
/// the tie order unpredictable in advance without breaking determinism.
pub fn tie_break_hash(order_id: &str, data_hash: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(order_id.as_bytes());
    hasher.update(data_hash);
    hasher.finalize().into()
}

/// Admissible execution window around the mid price
///
/// `ratio` is an integer percentage. A zero mid (market with no prior
/// execution) yields an unbounded band so the market can bootstrap.
pub fn price_band(mid: Decimal, ratio: i64) -> (Decimal, Decimal) {
    if mid.is_zero() {
        return (Decimal::ZERO, Decimal::MAX);
    }
    let hundred = Decimal::from(100);
    let low = mid * Decimal::from(100 - ratio) / hundred;
    let high = mid * Decimal::from(100 + ratio) / hundred;
    (low, high)
}

fn priority(a: &TradeCandidate, b: &TradeCandidate, price_desc: bool) -> Ordering {
    let by_price = if price_desc {
        b.price.cmp(&a.price)
    } else {
        a.price.cmp(&b.price)
    };
    by_price
        .then_with(|| a.height.cmp(&b.height))
        .then_with(|| a.hash.cmp(&b.hash))
}

/// Run all admissible fills between `bids` and `asks`
///
/// For each fill, `exec.deal` is called exactly once with the bid, the ask,
/// the amount `min(availables)`, and the execution price: the admissible
/// price closest to `mid` within `[max(low, ask.price), min(high,
/// bid.price)]`. An order whose price falls outside the band is skipped; an
/// order reporting zero availability is skipped permanently for this pass.
pub fn match_orders(
    high: Decimal,
    mid: Decimal,
    low: Decimal,
    mut bids: Vec<TradeCandidate>,
    mut asks: Vec<TradeCandidate>,
    exec: &mut dyn DealExec,
) {
    bids.sort_by(|a, b| priority(a, b, true));
    asks.sort_by(|a, b| priority(a, b, false));

    let mut bi = 0;
    let mut ai = 0;
    while bi < bids.len() && ai < asks.len() {
        let bid = &bids[bi];
        let ask = &asks[ai];

        let bid_avail = exec.available(&bid.id);
        if bid_avail == 0 {
            bi += 1;
            continue;
        }
        let ask_avail = exec.available(&ask.id);
        if ask_avail == 0 {
            ai += 1;
            continue;
        }

        if bid.price < ask.price {
            break;
        }

        let floor = low.max(ask.price);
        let ceiling = high.min(bid.price);
        if floor > ceiling {
            // The band excludes this pairing; drop whichever side's price
            // violates it and look at the next order there.
            if ask.price > high {
                ai += 1;
            } else {
                bi += 1;
            }
            continue;
        }

        let price = mid.clamp(floor, ceiling);
        let amount = bid_avail.min(ask_avail);
        exec.deal(&bid.id, &ask.id, amount, price);
    }
}
