//! Asset registry queries
//!
//! The engine consults the registry for two facts only: whether a token is
//! globally forbidden, and whether a token's issuer has forbidden a specific
//! sender. `StoreAssetKeeper` is the store-backed implementation; hosts with
//! their own registry supply the trait instead.

use crate::keys;
use serde::{Deserialize, Serialize};
use store::KvStore;
use types::ids::Address;

/// Read-only view over token forbid status
pub trait AssetStatusKeeper {
    /// Global freeze: a forbidden token cannot be exchanged at all
    fn is_token_forbidden(&self, denom: &str) -> bool;

    /// Per-sender sanction by the token issuer
    fn is_forbidden_by_token_issuer(&self, denom: &str, addr: &Address) -> bool;
}

/// Token registry record
///
/// Only the fields the engine's queries depend on; the full registry lives
/// outside this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub symbol: String,
    pub owner: Address,
    pub is_forbidden: bool,
    pub addr_forbiddable: bool,
}

/// Store-backed registry view
#[derive(Debug, Clone, Default)]
pub struct StoreAssetKeeper<S: KvStore> {
    store: S,
}

impl<S: KvStore> StoreAssetKeeper<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn set_token(&mut self, token: &TokenRecord) {
        let bytes = serde_json::to_vec(token).expect("token serialization never fails");
        self.store.set(&keys::token_key(&token.symbol), bytes);
    }

    pub fn get_token(&self, symbol: &str) -> Option<TokenRecord> {
        self.store.get(&keys::token_key(symbol)).map(|bytes| {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("corrupt token record: {e}"))
        })
    }

    /// Issuer-level sanction on an address
    pub fn forbid_address(&mut self, symbol: &str, addr: &Address) {
        self.store
            .set(&keys::forbid_addr_key(symbol, addr.as_str()), Vec::new());
    }

    pub fn unforbid_address(&mut self, symbol: &str, addr: &Address) {
        self.store
            .delete(&keys::forbid_addr_key(symbol, addr.as_str()));
    }

    /// Whitelisted addresses are exempt from issuer-level sanctions
    pub fn add_whitelist(&mut self, symbol: &str, addr: &Address) {
        self.store
            .set(&keys::whitelist_key(symbol, addr.as_str()), Vec::new());
    }
}

impl<S: KvStore> AssetStatusKeeper for StoreAssetKeeper<S> {
    fn is_token_forbidden(&self, denom: &str) -> bool {
        // An unknown token counts as forbidden: nothing unregistered trades.
        match self.get_token(denom) {
            Some(token) => token.is_forbidden,
            None => true,
        }
    }

    fn is_forbidden_by_token_issuer(&self, denom: &str, addr: &Address) -> bool {
        let Some(token) = self.get_token(denom) else {
            return false;
        };
        if !token.addr_forbiddable {
            return false;
        }
        if self
            .store
            .get(&keys::whitelist_key(denom, addr.as_str()))
            .is_some()
        {
            return false;
        }
        self.store
            .get(&keys::forbid_addr_key(denom, addr.as_str()))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemStore;

    fn token(symbol: &str, forbidden: bool, addr_forbiddable: bool) -> TokenRecord {
        TokenRecord {
            symbol: symbol.to_string(),
            owner: Address::new("coinex1issuer"),
            is_forbidden: forbidden,
            addr_forbiddable,
        }
    }

    #[test]
    fn test_unknown_token_is_forbidden() {
        let keeper = StoreAssetKeeper::new(MemStore::new());
        assert!(keeper.is_token_forbidden("GHOST"));
    }

    #[test]
    fn test_global_forbid_flag() {
        let mut keeper = StoreAssetKeeper::new(MemStore::new());
        keeper.set_token(&token("ABC", false, false));
        keeper.set_token(&token("BAD", true, false));

        assert!(!keeper.is_token_forbidden("ABC"));
        assert!(keeper.is_token_forbidden("BAD"));
    }

    #[test]
    fn test_issuer_forbid_requires_flag() {
        let mut keeper = StoreAssetKeeper::new(MemStore::new());
        let addr = Address::new("coinex1target");

        keeper.set_token(&token("ABC", false, false));
        keeper.forbid_address("ABC", &addr);
        // Token does not support address forbidding, so the entry is inert
        assert!(!keeper.is_forbidden_by_token_issuer("ABC", &addr));
    }

    #[test]
    fn test_issuer_forbid_and_whitelist() {
        let mut keeper = StoreAssetKeeper::new(MemStore::new());
        let addr = Address::new("coinex1target");

        keeper.set_token(&token("ABC", false, true));
        assert!(!keeper.is_forbidden_by_token_issuer("ABC", &addr));

        keeper.forbid_address("ABC", &addr);
        assert!(keeper.is_forbidden_by_token_issuer("ABC", &addr));

        keeper.add_whitelist("ABC", &addr);
        assert!(!keeper.is_forbidden_by_token_issuer("ABC", &addr));

        keeper.unforbid_address("ABC", &addr);
        assert!(!keeper.is_forbidden_by_token_issuer("ABC", &addr));
    }

    #[test]
    fn test_unknown_token_never_issuer_forbids() {
        let keeper = StoreAssetKeeper::new(MemStore::new());
        let addr = Address::new("coinex1target");
        assert!(!keeper.is_forbidden_by_token_issuer("GHOST", &addr));
    }
}
