//! Market records and the order-clean-time marker

use crate::keys;
use store::KvStore;
use types::market::MarketInfo;

/// Persist a market record under its symbol
pub fn set_market(store: &mut dyn KvStore, market: &MarketInfo) {
    let bytes = serde_json::to_vec(market).expect("market serialization never fails");
    store.set(&keys::market_key(&market.symbol()), bytes);
}

pub fn get_market(store: &dyn KvStore, symbol: &str) -> Option<MarketInfo> {
    store.get(&keys::market_key(symbol)).map(|bytes| {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("corrupt market record: {e}"))
    })
}

pub fn remove_market(store: &mut dyn KvStore, symbol: &str) {
    store.delete(&keys::market_key(symbol));
}

/// All listed markets in ascending symbol order
///
/// This ordering is the deterministic cross-market iteration order of the
/// end-of-block pass.
pub fn all_markets(store: &dyn KvStore) -> Vec<MarketInfo> {
    store
        .scan_prefix(&[keys::MARKET_PREFIX])
        .into_iter()
        .map(|(_, bytes)| {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("corrupt market record: {e}"))
        })
        .collect()
}

/// Unix time of the last housekeeping block, 0 before the first one
pub fn order_clean_time(store: &dyn KvStore) -> i64 {
    store
        .get(&[keys::ORDER_CLEAN_TIME_KEY])
        .map(|bytes| {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|e| panic!("corrupt clean-time record: {e}"))
        })
        .unwrap_or(0)
}

pub fn set_order_clean_time(store: &mut dyn KvStore, time: i64) {
    let bytes = serde_json::to_vec(&time).expect("i64 serialization never fails");
    store.set(&[keys::ORDER_CLEAN_TIME_KEY], bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use store::MemStore;
    use types::ids::Address;

    fn market(stock: &str, money: &str) -> MarketInfo {
        MarketInfo {
            stock: stock.to_string(),
            money: money.to_string(),
            price_precision: 8,
            last_executed_price: dec!(0),
            creator: Address::new("coinex1creator"),
        }
    }

    #[test]
    fn test_market_roundtrip() {
        let mut store = MemStore::new();
        let info = market("ABC", "USD");

        set_market(&mut store, &info);
        assert_eq!(get_market(&store, "ABC/USD"), Some(info));
        assert_eq!(get_market(&store, "XYZ/USD"), None);
    }

    #[test]
    fn test_remove_market() {
        let mut store = MemStore::new();
        set_market(&mut store, &market("ABC", "USD"));
        remove_market(&mut store, "ABC/USD");
        assert_eq!(get_market(&store, "ABC/USD"), None);
    }

    #[test]
    fn test_all_markets_symbol_order() {
        let mut store = MemStore::new();
        set_market(&mut store, &market("ZZZ", "USD"));
        set_market(&mut store, &market("ABC", "USD"));
        set_market(&mut store, &market("MMM", "USD"));

        let symbols: Vec<String> = all_markets(&store).iter().map(|m| m.symbol()).collect();
        assert_eq!(symbols, vec!["ABC/USD", "MMM/USD", "ZZZ/USD"]);
    }

    #[test]
    fn test_order_clean_time_defaults_to_zero() {
        let mut store = MemStore::new();
        assert_eq!(order_clean_time(&store), 0);

        set_order_clean_time(&mut store, 1_700_000_000);
        assert_eq!(order_clean_time(&store), 1_700_000_000);
    }
}
