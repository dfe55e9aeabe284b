//! Settlement adapter
//!
//! Owns the mutable order state for one market's matching pass and turns the
//! matcher's abstract fills into order mutations plus balance transfers. The
//! per-pass map is the only mutable view of the orders; the keeper's
//! persisted copies are untouched until write-back.

use crate::bank::BankKeeper;
use crate::matching::band::DealExec;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use types::coin::Coin;
use types::errors::AccountingError;
use types::ids::TradingPair;
use types::numeric::trunc_to_i64;
use types::order::{Order, Side};

/// Abort the block on an accounting failure
///
/// Reserved funds missing mid-fill means state corruption; the host rolls
/// the block back, so there is nothing to recover locally.
pub(crate) fn must(result: Result<(), AccountingError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "accounting invariant violated, aborting block");
        panic!("accounting invariant violated: {e}");
    }
}

/// Outcome of one market's matching pass
#[derive(Debug, Clone)]
pub struct PassResult {
    /// Changed orders only, keyed by order id string
    pub orders_for_update: BTreeMap<String, Order>,
    /// `(deal_stock, deal_money)` gained this pass, per changed order
    pub fill_deltas: BTreeMap<String, (i64, i64)>,
    /// Price of the pass's final fill, zero when nothing dealt
    pub last_price: Decimal,
}

/// Per-pass mutable context over one market's candidate orders
pub struct SettleContext<'a> {
    stock: String,
    money: String,
    bank: &'a mut dyn BankKeeper,
    orders: BTreeMap<String, Order>,
    old_deals: BTreeMap<String, (i64, i64)>,
    changed: BTreeSet<String>,
    last_price: Decimal,
}

impl<'a> SettleContext<'a> {
    pub fn new(pair: &TradingPair, candidates: Vec<Order>, bank: &'a mut dyn BankKeeper) -> Self {
        let mut orders = BTreeMap::new();
        let mut old_deals = BTreeMap::new();
        for order in candidates {
            let id = order.order_id().to_string();
            old_deals.insert(id.clone(), (order.deal_stock, order.deal_money));
            orders.insert(id, order);
        }
        Self {
            stock: pair.stock().to_string(),
            money: pair.money().to_string(),
            bank,
            orders,
            old_deals,
            changed: BTreeSet::new(),
            last_price: Decimal::ZERO,
        }
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn is_changed(&self, id: &str) -> bool {
        self.changed.contains(id)
    }

    /// Fold an order into the changed set without touching it
    ///
    /// Used for IOC orders the matcher never dealt with: they still need
    /// write-back processing, with zero fill deltas.
    pub fn include_untouched(&mut self, order: Order) {
        let id = order.order_id().to_string();
        self.old_deals
            .entry(id.clone())
            .or_insert((order.deal_stock, order.deal_money));
        self.orders.entry(id.clone()).or_insert(order);
        self.changed.insert(id);
    }

    pub fn finish(self) -> PassResult {
        let mut orders_for_update = BTreeMap::new();
        let mut fill_deltas = BTreeMap::new();
        for id in self.changed {
            let order = self.orders.get(&id).expect("changed order must exist");
            let (old_stock, old_money) = self.old_deals[&id];
            fill_deltas.insert(
                id.clone(),
                (order.deal_stock - old_stock, order.deal_money - old_money),
            );
            orders_for_update.insert(id, order.clone());
        }
        PassResult {
            orders_for_update,
            fill_deltas,
            last_price: self.last_price,
        }
    }
}

impl DealExec for SettleContext<'_> {
    fn available(&self, id: &str) -> i64 {
        match self.orders.get(id) {
            Some(order) if !order.is_under_frozen() => order.left_stock,
            _ => 0,
        }
    }

    fn deal(&mut self, bid_id: &str, ask_id: &str, amount: i64, price: Decimal) {
        let money_amount = trunc_to_i64(price * Decimal::from(amount));

        let buyer = self.orders.get_mut(bid_id).expect("unknown bid in deal");
        debug_assert_eq!(buyer.side, Side::Buy);
        buyer.left_stock -= amount;
        buyer.freeze -= money_amount;
        buyer.deal_stock += amount;
        buyer.deal_money += money_amount;
        let buyer_addr = buyer.sender.clone();

        let seller = self.orders.get_mut(ask_id).expect("unknown ask in deal");
        debug_assert_eq!(seller.side, Side::Sell);
        seller.left_stock -= amount;
        seller.freeze -= amount;
        seller.deal_stock += amount;
        seller.deal_money += money_amount;
        let seller_addr = seller.sender.clone();

        // Exchange the coins: stock moves seller -> buyer, money buyer -> seller.
        let stock_coins = [Coin::new(self.stock.clone(), amount)];
        let money_coins = [Coin::new(self.money.clone(), money_amount)];
        must(self.bank.unfreeze_coins(&seller_addr, &stock_coins));
        must(self.bank.send_coins(&seller_addr, &buyer_addr, &stock_coins));
        must(self.bank.unfreeze_coins(&buyer_addr, &money_coins));
        must(self.bank.send_coins(&buyer_addr, &seller_addr, &money_coins));

        self.changed.insert(bid_id.to_string());
        self.changed.insert(ask_id.to_string());
        self.last_price = price;
    }
}
