//! Event emission
//!
//! Fill and cancellation records for downstream indexers. Payloads are
//! canonical JSON with fixed field order, so the byte stream is stable
//! across replicas and versions. Nothing is serialized unless the
//! subscriber topic is active.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::order::Side;

pub const FILL_ORDER_INFO_KEY: &str = "fill_order_info";
pub const CANCEL_ORDER_INFO_KEY: &str = "cancel_order_info";

/// Why an order left the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelReason {
    IocType,
    AllFilled,
    NoEnoughMoney,
    GteTimeOut,
    NotKnown,
}

/// Per-block fill summary for one order
///
/// `curr_stock` / `curr_money` are this block's deltas; the other fields are
/// cumulative order state after the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOrderInfo {
    pub order_id: String,
    pub height: i64,
    pub trading_pair: String,
    pub side: Side,
    pub price: Decimal,
    pub left_stock: i64,
    pub freeze: i64,
    pub deal_stock: i64,
    pub deal_money: i64,
    pub curr_stock: i64,
    pub curr_money: i64,
}

/// Terminal removal record for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOrderInfo {
    pub order_id: String,
    pub trading_pair: String,
    pub side: Side,
    pub height: i64,
    pub price: Decimal,
    pub del_reason: DelReason,
    pub used_commission: i64,
    pub left_stock: i64,
    pub remain_amount: i64,
    pub deal_stock: i64,
    pub deal_money: i64,
}

/// Subscriber topic the engine publishes into
pub trait EventSink {
    /// Whether anyone is listening; emission is skipped entirely otherwise
    fn is_subscribed(&self) -> bool;

    fn publish(&mut self, kind: &'static str, payload: Vec<u8>);
}

/// Collects published events in order; test and replay sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecSink {
    pub events: Vec<(&'static str, Vec<u8>)>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode all payloads published under `kind`
    pub fn decoded<T: serde::de::DeserializeOwned>(&self, kind: &str) -> Vec<T> {
        self.events
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, payload)| {
                serde_json::from_slice(payload).expect("published payload must decode")
            })
            .collect()
    }
}

impl EventSink for VecSink {
    fn is_subscribed(&self) -> bool {
        true
    }

    fn publish(&mut self, kind: &'static str, payload: Vec<u8>) {
        self.events.push((kind, payload));
    }
}

/// Sink with no subscriber; every publish is a no-op
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn is_subscribed(&self) -> bool {
        false
    }

    fn publish(&mut self, _kind: &'static str, _payload: Vec<u8>) {}
}

pub fn emit_fill(sink: &mut dyn EventSink, info: &FillOrderInfo) {
    if sink.is_subscribed() {
        let payload = serde_json::to_vec(info).expect("fill info serialization never fails");
        sink.publish(FILL_ORDER_INFO_KEY, payload);
    }
}

pub fn emit_cancel(sink: &mut dyn EventSink, info: &CancelOrderInfo) {
    if sink.is_subscribed() {
        let payload = serde_json::to_vec(info).expect("cancel info serialization never fails");
        sink.publish(CANCEL_ORDER_INFO_KEY, payload);
    }
}
