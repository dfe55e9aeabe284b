//! Time-indexed queue of scheduled market removals
//!
//! Keys sort by effective time, so one ascending scan yields every request
//! due at or before a given moment.

use crate::keys;
use store::KvStore;
use types::market::DelistRequest;

/// Schedule a market for removal once its effective time has passed
pub fn add_delist_request(store: &mut dyn KvStore, request: &DelistRequest) {
    store.set(
        &keys::delist_key(request.effective_time, &request.symbol),
        Vec::new(),
    );
}

/// Every request with `effective_time <= bound`, in queue order
pub fn delist_requests_before(store: &dyn KvStore, bound: i64) -> Vec<DelistRequest> {
    store
        .scan_prefix(&[keys::DELIST_PREFIX])
        .into_iter()
        .map(|(key, _)| {
            let (effective_time, symbol) = keys::delist_key_parts(&key);
            DelistRequest {
                effective_time,
                symbol,
            }
        })
        .take_while(|request| request.effective_time <= bound)
        .collect()
}

/// Symbols of every request with `effective_time <= bound`, in queue order
pub fn delist_symbols_before(store: &dyn KvStore, bound: i64) -> Vec<String> {
    delist_requests_before(store, bound)
        .into_iter()
        .map(|request| request.symbol)
        .collect()
}

/// Purge every request with `effective_time <= bound`
pub fn remove_delist_requests_before(store: &mut dyn KvStore, bound: i64) {
    let expired: Vec<Vec<u8>> = store
        .scan_prefix(&[keys::DELIST_PREFIX])
        .into_iter()
        .filter(|(key, _)| keys::delist_key_parts(key).0 <= bound)
        .map(|(key, _)| key)
        .collect();
    for key in expired {
        store.delete(&key);
    }
}
