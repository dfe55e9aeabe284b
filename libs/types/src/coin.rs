//! Asset transfer units
//!
//! The balance keeper moves value as denominated integer amounts.

use serde::{Deserialize, Serialize};

/// Denomination of the chain's fee asset; order commissions are frozen and
/// collected in this denom.
pub const FEE_DENOM: &str = "cet";

/// A denominated integer amount handed to the balance keeper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: i64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: i64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}
