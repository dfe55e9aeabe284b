//! Parameter snapshot access
//!
//! Governance writes the record; the engine only reads one snapshot per
//! block. A missing record yields the defaults.

use crate::keys;
use store::KvStore;
use types::params::Params;

pub fn load_params(store: &dyn KvStore) -> Params {
    store
        .get(&[keys::PARAMS_KEY])
        .map(|bytes| {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|e| panic!("corrupt params record: {e}"))
        })
        .unwrap_or_default()
}

pub fn save_params(store: &mut dyn KvStore, params: &Params) {
    let bytes = serde_json::to_vec(params).expect("params serialization never fails");
    store.set(&[keys::PARAMS_KEY], bytes);
}
