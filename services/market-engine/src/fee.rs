//! Fee engine
//!
//! Commissions ride along in an order's `frozen_fee` escrow until the order
//! becomes terminal; only then is the actual fee computed and collected.

use crate::bank::BankKeeper;
use crate::matching::settle::must;
use rust_decimal::Decimal;
use types::coin::{Coin, FEE_DENOM};
use types::numeric::round_to_i64;
use types::order::Order;
use types::params::{Params, MARKET_FEE_RATE_PRECISION};

/// Actual commission owed by an order at terminal removal
///
/// Orders that dealt pay `deal_money · market_fee_rate / 10^4`, floored at
/// `market_fee_min`; orders removed without any fill pay the flat
/// zero-deal fee.
pub fn order_commission(order: &Order, params: &Params) -> i64 {
    if order.deal_stock > 0 {
        let rate_fee = Decimal::from(order.deal_money) * Decimal::from(params.market_fee_rate)
            / Decimal::from(10i64.pow(MARKET_FEE_RATE_PRECISION));
        round_to_i64(rate_fee).max(params.market_fee_min)
    } else {
        params.fee_for_zero_deal
    }
}

/// Release an order's escrow and collect its commission
///
/// Runs on every terminal removal. The fee was reserved at submission, so a
/// collection failure is an accounting invariant violation and aborts the
/// block.
pub fn release_escrow_and_collect(bank: &mut dyn BankKeeper, order: &Order, params: &Params) {
    if order.freeze != 0 {
        let coins = [Coin::new(order.frozen_denom(), order.freeze)];
        must(bank.unfreeze_coins(&order.sender, &coins));
    }
    if order.frozen_fee != 0 {
        let coins = [Coin::new(FEE_DENOM, order.frozen_fee)];
        must(bank.unfreeze_coins(&order.sender, &coins));
        let fee = order_commission(order, params);
        must(bank.subtract_fee_and_collect(&order.sender, fee));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::LedgerBank;
    use rust_decimal_macros::dec;
    use types::ids::{Address, TradingPair};
    use types::order::{Side, TimeInForce};

    fn params() -> Params {
        Params {
            market_fee_rate: 10, // 0.10%
            market_fee_min: 5,
            fee_for_zero_deal: 3,
            ..Params::default()
        }
    }

    fn order(side: Side, deal_stock: i64, deal_money: i64) -> Order {
        Order {
            sender: Address::new("coinex1fee"),
            sequence: 1,
            trading_pair: TradingPair::new("ABC/USD"),
            side,
            price: dec!(10),
            quantity: 10,
            left_stock: 10 - deal_stock,
            freeze: 60,
            frozen_fee: 20,
            deal_stock,
            deal_money,
            height: 1,
            exist_blocks: 0,
            time_in_force: TimeInForce::Gte,
        }
    }

    #[test]
    fn test_zero_deal_pays_flat_fee() {
        assert_eq!(order_commission(&order(Side::Buy, 0, 0), &params()), 3);
    }

    #[test]
    fn test_dealt_order_pays_rate_fee_with_floor() {
        // 10000 * 10 / 10^4 = 10 > min 5
        assert_eq!(order_commission(&order(Side::Buy, 4, 10_000), &params()), 10);
        // 1000 * 10 / 10^4 = 1 -> floored at 5
        assert_eq!(order_commission(&order(Side::Buy, 4, 1_000), &params()), 5);
    }

    #[test]
    fn test_rate_fee_rounds_half_away_from_zero() {
        // 2500 * 10 / 10^4 = 2.5 -> 3, then floored at 5
        let p = Params {
            market_fee_min: 0,
            ..params()
        };
        assert_eq!(order_commission(&order(Side::Buy, 4, 2_500), &p), 3);
    }

    #[test]
    fn test_release_unfreezes_and_collects() {
        let p = params();
        let o = order(Side::Buy, 0, 0);
        let mut bank = LedgerBank::new();
        bank.set_balance(&o.sender, "USD", 0, o.freeze);
        bank.set_balance(&o.sender, FEE_DENOM, 0, o.frozen_fee);

        release_escrow_and_collect(&mut bank, &o, &p);

        assert_eq!(bank.balance(&o.sender, "USD").free, 60);
        assert_eq!(bank.balance(&o.sender, "USD").frozen, 0);
        // Fee escrow released, flat zero-deal fee collected
        assert_eq!(bank.balance(&o.sender, FEE_DENOM).free, 20 - 3);
        assert_eq!(bank.collected_fees(), 3);
    }

    #[test]
    fn test_release_skips_empty_escrow() {
        let p = params();
        let mut o = order(Side::Sell, 10, 100);
        o.freeze = 0;
        o.frozen_fee = 0;
        let mut bank = LedgerBank::new();

        // Nothing frozen, nothing collected, no panic
        release_escrow_and_collect(&mut bank, &o, &p);
        assert_eq!(bank.collected_fees(), 0);
    }

    #[test]
    #[should_panic(expected = "accounting invariant violated")]
    fn test_missing_fee_escrow_aborts() {
        let p = params();
        let o = order(Side::Buy, 0, 0);
        let mut bank = LedgerBank::new();
        bank.set_balance(&o.sender, "USD", 0, o.freeze);
        // Fee escrow missing entirely

        release_escrow_and_collect(&mut bank, &o, &p);
    }
}
