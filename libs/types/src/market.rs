//! Market and delist records

use crate::ids::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One record per listed trading pair
///
/// `last_executed_price` anchors the next block's price band and is mutated
/// only by the matching pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub stock: String,
    pub money: String,
    pub price_precision: u8,
    pub last_executed_price: Decimal,
    pub creator: Address,
}

impl MarketInfo {
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.stock, self.money)
    }
}

/// A scheduled market removal, effective once the governance-minimum waiting
/// time has passed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelistRequest {
    pub effective_time: i64,
    pub symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_symbol() {
        let market = MarketInfo {
            stock: "ABC".to_string(),
            money: "USD".to_string(),
            price_precision: 8,
            last_executed_price: dec!(10),
            creator: Address::new("coinex1creator"),
        };
        assert_eq!(market.symbol(), "ABC/USD");
    }

    #[test]
    fn test_market_serde_roundtrip() {
        let market = MarketInfo {
            stock: "ABC".to_string(),
            money: "USD".to_string(),
            price_precision: 8,
            last_executed_price: dec!(9.95),
            creator: Address::new("coinex1creator"),
        };
        let json = serde_json::to_string(&market).unwrap();
        let back: MarketInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(market, back);
    }
}
