//! Price-band matching
//!
//! `band` holds the pure matching algorithm; `settle` applies its fills to
//! real orders and balances.

pub mod band;
pub mod settle;

pub use band::{match_orders, price_band, tie_break_hash, DealExec, TradeCandidate};
pub use settle::{PassResult, SettleContext};
