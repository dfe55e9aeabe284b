//! Order lifecycle types
//!
//! A resting limit order together with its escrow bookkeeping. Orders are
//! created by the transaction handler, mutated only by the matching pass,
//! and removed on a terminal condition.

use crate::errors::OrderError;
use crate::ids::{Address, OrderId, TradingPair};
use crate::numeric::round_to_i64;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Time-in-force policy for orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good-till-expiry: rests until filled, cancelled, or its lifetime lapses
    Gte,
    /// Immediate-or-cancel: survives at most one matching pass
    Ioc,
}

/// A resting or newly-submitted limit order
///
/// Escrow invariants:
/// - Sell: `freeze` is stock units, decreasing by the fill amount per fill.
/// - Buy: `freeze` is money units, decreasing by `trunc(price · amount)` per
///   fill; the order is under-frozen once `freeze < round(price · left_stock)`.
/// - `deal_stock + left_stock == quantity` at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub sender: Address,
    pub sequence: u64,
    pub trading_pair: TradingPair,
    pub side: Side,
    pub price: Decimal,
    pub quantity: i64,
    pub left_stock: i64,
    pub freeze: i64,
    pub frozen_fee: i64,
    pub deal_stock: i64,
    pub deal_money: i64,
    pub height: i64,
    pub exist_blocks: i64,
    pub time_in_force: TimeInForce,
}

impl Order {
    pub fn order_id(&self) -> OrderId {
        OrderId::new(self.sender.clone(), self.sequence)
    }

    pub fn is_filled(&self) -> bool {
        self.left_stock == 0
    }

    /// True when a buyer's frozen money no longer covers its remaining stock
    pub fn is_under_frozen(&self) -> bool {
        self.side == Side::Buy
            && self.freeze < round_to_i64(self.price * Decimal::from(self.left_stock))
    }

    /// Denomination held in escrow for this order (money for buys, stock for
    /// sells)
    pub fn frozen_denom(&self) -> &str {
        match self.side {
            Side::Buy => self.trading_pair.money(),
            Side::Sell => self.trading_pair.stock(),
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        if self.price <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(self.price.to_string()));
        }
        if self.quantity <= 0 {
            return Err(OrderError::InvalidQuantity(self.quantity));
        }
        if self.left_stock < 0 || self.left_stock > self.quantity {
            return Err(OrderError::InvalidQuantity(self.left_stock));
        }
        if self.deal_stock + self.left_stock != self.quantity {
            return Err(OrderError::QuantityMismatch {
                deal_stock: self.deal_stock,
                left_stock: self.left_stock,
                quantity: self.quantity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order(side: Side) -> Order {
        Order {
            sender: Address::new("coinex1sender"),
            sequence: 1,
            trading_pair: TradingPair::new("ABC/USD"),
            side,
            price: dec!(10),
            quantity: 5,
            left_stock: 5,
            freeze: if side == Side::Buy { 50 } else { 5 },
            frozen_fee: 10,
            deal_stock: 0,
            deal_money: 0,
            height: 100,
            exist_blocks: 0,
            time_in_force: TimeInForce::Gte,
        }
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_id() {
        let order = sample_order(Side::Buy);
        assert_eq!(order.order_id().to_string(), "coinex1sender-1");
    }

    #[test]
    fn test_frozen_denom() {
        assert_eq!(sample_order(Side::Buy).frozen_denom(), "USD");
        assert_eq!(sample_order(Side::Sell).frozen_denom(), "ABC");
    }

    #[test]
    fn test_under_frozen_detection() {
        let mut order = sample_order(Side::Buy);
        assert!(!order.is_under_frozen());

        // 49 < round(10 * 5) = 50
        order.freeze = 49;
        assert!(order.is_under_frozen());

        // Sell orders are never money-frozen
        let mut sell = sample_order(Side::Sell);
        sell.freeze = 0;
        assert!(!sell.is_under_frozen());
    }

    #[test]
    fn test_under_frozen_rounds_half_away_from_zero() {
        let mut order = sample_order(Side::Buy);
        order.price = dec!(9.5);
        order.left_stock = 5;
        order.quantity = 5;
        // round(9.5 * 5) = round(47.5) = 48
        order.freeze = 48;
        assert!(!order.is_under_frozen());
        order.freeze = 47;
        assert!(order.is_under_frozen());
    }

    #[test]
    fn test_validate_accepts_consistent_order() {
        let mut order = sample_order(Side::Buy);
        order.deal_stock = 2;
        order.left_stock = 3;
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_state() {
        let mut order = sample_order(Side::Buy);
        order.price = dec!(0);
        assert!(order.validate().is_err());

        let mut order = sample_order(Side::Buy);
        order.deal_stock = 1;
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_serde_stable_field_names() {
        let order = sample_order(Side::Sell);
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"side\":\"SELL\""));
        assert!(json.contains("\"time_in_force\":\"GTE\""));
        assert!(json.contains("\"price\":\"10\""));

        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
