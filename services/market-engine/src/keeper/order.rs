//! Per-pair order book keeper
//!
//! Owns the persisted order state for one trading pair: a primary index by
//! price (big-endian, so scans walk the book in price order) and a secondary
//! index by submission height for expiry and IOC queries.

use crate::keys;
use store::KvStore;
use types::ids::TradingPair;
use types::order::Order;

/// Keeper for one pair's resting orders
#[derive(Debug, Clone)]
pub struct OrderKeeper {
    pair: TradingPair,
}

impl OrderKeeper {
    pub fn new(pair: TradingPair) -> Self {
        Self { pair }
    }

    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    /// Insert or overwrite an order, maintaining both indexes
    pub fn add(&self, store: &mut dyn KvStore, order: &Order) {
        let id = order.order_id();
        let primary = keys::order_book_key(self.pair.as_str(), order.price, &id);
        let height = keys::order_height_key(self.pair.as_str(), order.height, &id);
        let bytes = serde_json::to_vec(order).expect("order serialization never fails");
        store.set(&primary, bytes);
        store.set(&height, primary.clone());
    }

    /// Delete an order from both indexes; absent entries are ignored
    pub fn remove(&self, store: &mut dyn KvStore, order: &Order) {
        let id = order.order_id();
        let primary = keys::order_book_key(self.pair.as_str(), order.price, &id);
        let height = keys::order_height_key(self.pair.as_str(), order.height, &id);
        store.delete(&primary);
        store.delete(&height);
    }

    /// Every active order of this pair
    ///
    /// Returned in price-key order, but callers must not rely on it: the
    /// matcher re-sorts with its own priority rule.
    pub fn matching_candidates(&self, store: &dyn KvStore) -> Vec<Order> {
        store
            .scan_prefix(&keys::order_book_scan_prefix(self.pair.as_str()))
            .into_iter()
            .map(|(_, value)| decode_order(&value))
            .collect()
    }

    /// Orders submitted exactly at `height`
    pub fn orders_at_height(&self, store: &dyn KvStore, height: i64) -> Vec<Order> {
        store
            .scan_prefix(&keys::order_height_at_prefix(self.pair.as_str(), height))
            .into_iter()
            .map(|(_, primary)| self.load_primary(store, &primary))
            .collect()
    }

    /// Orders with `height <= bound`
    pub fn older_than(&self, store: &dyn KvStore, bound: i64) -> Vec<Order> {
        store
            .scan_prefix(&keys::order_height_scan_prefix(self.pair.as_str()))
            .into_iter()
            .take_while(|(key, _)| keys::height_from_index_key(self.pair.as_str(), key) <= bound)
            .map(|(_, primary)| self.load_primary(store, &primary))
            .collect()
    }

    fn load_primary(&self, store: &dyn KvStore, primary: &[u8]) -> Order {
        let value = store
            .get(primary)
            .unwrap_or_else(|| panic!("height index points at missing order for {}", self.pair));
        decode_order(&value)
    }
}

fn decode_order(bytes: &[u8]) -> Order {
    serde_json::from_slice(bytes).unwrap_or_else(|e| panic!("corrupt order record: {e}"))
}
