//! Governance-tunable parameters
//!
//! A `Params` value is a read-only snapshot taken once per block; the engine
//! never writes parameters back.

use crate::errors::ParamsError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CREATE_MARKET_FEE: i64 = 1_000_000_000_000; // 10000 * 10^8
pub const DEFAULT_FIXED_TRADE_FEE: i64 = 1_000_000;
pub const DEFAULT_GTE_ORDER_LIFETIME: i64 = 10_000;
pub const DEFAULT_GTE_ORDER_FEATURE_FEE_BY_BLOCKS: i64 = 6_000_000;
pub const DEFAULT_MAX_EXECUTED_PRICE_CHANGE_RATIO: i64 = 25;
pub const MARKET_FEE_RATE_PRECISION: u32 = 4;
pub const DEFAULT_MARKET_FEE_RATE: i64 = 10;
pub const DEFAULT_MARKET_FEE_MIN: i64 = 1_000_000;
pub const DEFAULT_FEE_FOR_ZERO_DEAL: i64 = 1_000_000;
pub const DEFAULT_MARKET_MIN_EXPIRED_TIME: i64 = 7 * 24 * 60 * 60; // seconds

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Fee charged for creating a market
    pub create_market_fee: i64,
    /// Flat per-trade fee component
    pub fixed_trade_fee: i64,
    /// Minimum waiting time before a delist request takes effect, in seconds
    pub market_min_expired_time: i64,
    /// GTE order lifetime in blocks
    pub gte_order_lifetime: i64,
    /// Fee for extending a GTE order's lifetime, per block
    pub gte_order_feature_fee_by_blocks: i64,
    /// Price band half-width as an integer percentage of the mid price
    pub max_executed_price_change_ratio: i64,
    /// Trade fee rate over 10^MARKET_FEE_RATE_PRECISION
    pub market_fee_rate: i64,
    /// Floor on the per-order trade fee
    pub market_fee_min: i64,
    /// Flat fee charged to orders removed without any fill
    pub fee_for_zero_deal: i64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            create_market_fee: DEFAULT_CREATE_MARKET_FEE,
            fixed_trade_fee: DEFAULT_FIXED_TRADE_FEE,
            market_min_expired_time: DEFAULT_MARKET_MIN_EXPIRED_TIME,
            gte_order_lifetime: DEFAULT_GTE_ORDER_LIFETIME,
            gte_order_feature_fee_by_blocks: DEFAULT_GTE_ORDER_FEATURE_FEE_BY_BLOCKS,
            max_executed_price_change_ratio: DEFAULT_MAX_EXECUTED_PRICE_CHANGE_RATIO,
            market_fee_rate: DEFAULT_MARKET_FEE_RATE,
            market_fee_min: DEFAULT_MARKET_FEE_MIN,
            fee_for_zero_deal: DEFAULT_FEE_FOR_ZERO_DEAL,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.create_market_fee <= 0 {
            return Err(ParamsError::NotPositive {
                field: "create_market_fee",
                value: self.create_market_fee,
            });
        }
        let non_negative = [
            ("fixed_trade_fee", self.fixed_trade_fee),
            ("market_min_expired_time", self.market_min_expired_time),
            ("gte_order_lifetime", self.gte_order_lifetime),
            (
                "gte_order_feature_fee_by_blocks",
                self.gte_order_feature_fee_by_blocks,
            ),
            (
                "max_executed_price_change_ratio",
                self.max_executed_price_change_ratio,
            ),
            ("market_fee_rate", self.market_fee_rate),
            ("market_fee_min", self.market_fee_min),
            ("fee_for_zero_deal", self.fee_for_zero_deal),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(ParamsError::Negative { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_create_market_fee() {
        let params = Params {
            create_market_fee: 0,
            ..Params::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("create_market_fee"));
    }

    #[test]
    fn test_validate_rejects_negative_fields() {
        let params = Params {
            market_fee_rate: -1,
            ..Params::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("market_fee_rate"));
    }

    #[test]
    fn test_params_serde_roundtrip() {
        let params = Params::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
