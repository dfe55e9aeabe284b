//! Balance keeper interface and in-memory ledger
//!
//! The engine never touches balances directly; it instructs the host's
//! balance keeper through this trait. `LedgerBank` is a faithful in-memory
//! implementation used by tests and standalone runs: it enforces the same
//! overdraw rules, so accounting mistakes in the engine surface as errors
//! rather than silently passing.

use std::collections::BTreeMap;
use types::coin::Coin;
use types::errors::AccountingError;
use types::ids::Address;

/// Host balance operations the engine depends on
pub trait BankKeeper {
    /// Release escrowed funds back to the free balance
    fn unfreeze_coins(&mut self, addr: &Address, coins: &[Coin]) -> Result<(), AccountingError>;

    /// Move free balance between accounts
    fn send_coins(
        &mut self,
        from: &Address,
        to: &Address,
        coins: &[Coin],
    ) -> Result<(), AccountingError>;

    /// Atomic debit into the fee collector
    fn subtract_fee_and_collect(
        &mut self,
        addr: &Address,
        amount: i64,
    ) -> Result<(), AccountingError>;
}

/// One account's holdings of a single denom
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    pub free: i64,
    pub frozen: i64,
}

/// In-memory double-entry ledger
///
/// Keyed by `(address, denom)` in a BTreeMap for deterministic inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerBank {
    balances: BTreeMap<(String, String), Balance>,
    collected_fees: i64,
}

impl LedgerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance (test setup and genesis)
    pub fn set_balance(&mut self, addr: &Address, denom: &str, free: i64, frozen: i64) {
        self.balances.insert(
            (addr.as_str().to_string(), denom.to_string()),
            Balance { free, frozen },
        );
    }

    pub fn balance(&self, addr: &Address, denom: &str) -> Balance {
        self.balances
            .get(&(addr.as_str().to_string(), denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    pub fn collected_fees(&self) -> i64 {
        self.collected_fees
    }

    /// Total supply of a denom across all accounts, frozen included, plus
    /// the fee pot when the denom is the fee asset. Conservation checks
    /// assert this never changes.
    pub fn total_of(&self, denom: &str) -> i64 {
        let held: i64 = self
            .balances
            .iter()
            .filter(|((_, d), _)| d == denom)
            .map(|(_, b)| b.free + b.frozen)
            .sum();
        if denom == types::coin::FEE_DENOM {
            held + self.collected_fees
        } else {
            held
        }
    }

    fn entry(&mut self, addr: &Address, denom: &str) -> &mut Balance {
        self.balances
            .entry((addr.as_str().to_string(), denom.to_string()))
            .or_default()
    }
}

impl BankKeeper for LedgerBank {
    fn unfreeze_coins(&mut self, addr: &Address, coins: &[Coin]) -> Result<(), AccountingError> {
        for coin in coins {
            let balance = self.entry(addr, &coin.denom);
            if balance.frozen < coin.amount {
                return Err(AccountingError::Unfreeze {
                    addr: addr.to_string(),
                    denom: coin.denom.clone(),
                    amount: coin.amount,
                    reason: format!("only {} frozen", balance.frozen),
                });
            }
            balance.frozen -= coin.amount;
            balance.free += coin.amount;
        }
        Ok(())
    }

    fn send_coins(
        &mut self,
        from: &Address,
        to: &Address,
        coins: &[Coin],
    ) -> Result<(), AccountingError> {
        for coin in coins {
            let source = self.entry(from, &coin.denom);
            if source.free < coin.amount {
                return Err(AccountingError::Send {
                    from: from.to_string(),
                    to: to.to_string(),
                    denom: coin.denom.clone(),
                    amount: coin.amount,
                    reason: format!("only {} free", source.free),
                });
            }
            source.free -= coin.amount;
            self.entry(to, &coin.denom).free += coin.amount;
        }
        Ok(())
    }

    fn subtract_fee_and_collect(
        &mut self,
        addr: &Address,
        amount: i64,
    ) -> Result<(), AccountingError> {
        let balance = self.entry(addr, types::coin::FEE_DENOM);
        if balance.free < amount {
            return Err(AccountingError::CollectFee {
                addr: addr.to_string(),
                amount,
                reason: format!("only {} free", balance.free),
            });
        }
        balance.free -= amount;
        self.collected_fees += amount;
        Ok(())
    }
}
