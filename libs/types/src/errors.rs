//! Error taxonomy
//!
//! Accounting failures are fatal to the block and surface as panics at the
//! point of use; everything else is an ordinary recoverable error.

use thiserror::Error;

/// Balance keeper failure
///
/// Any of these mid-fill means reserved funds went missing, which is state
/// corruption; callers abort the block instead of recovering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountingError {
    #[error("unfreeze of {amount} {denom} failed for {addr}: {reason}")]
    Unfreeze {
        addr: String,
        denom: String,
        amount: i64,
        reason: String,
    },

    #[error("transfer of {amount} {denom} from {from} to {to} failed: {reason}")]
    Send {
        from: String,
        to: String,
        denom: String,
        amount: i64,
        reason: String,
    },

    #[error("fee collection of {amount} failed for {addr}: {reason}")]
    CollectFee {
        addr: String,
        amount: i64,
        reason: String,
    },
}

/// Identifier parse failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid order id: {0}")]
    OrderId(String),

    #[error("trading pair must be in STOCK/MONEY format: {0}")]
    TradingPair(String),
}

/// Order state validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error(
        "deal_stock {deal_stock} + left_stock {left_stock} does not equal quantity {quantity}"
    )]
    QuantityMismatch {
        deal_stock: i64,
        left_stock: i64,
        quantity: i64,
    },
}

/// Parameter validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("{field} must be positive, is {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{field} must be non-negative, is {value}")]
    Negative { field: &'static str, value: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounting_error_display() {
        let err = AccountingError::Send {
            from: "alice".to_string(),
            to: "bob".to_string(),
            denom: "usd".to_string(),
            amount: 40,
            reason: "insufficient free balance".to_string(),
        };
        assert!(err.to_string().contains("40 usd"));
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::OrderId("bogus".to_string());
        assert_eq!(err.to_string(), "invalid order id: bogus");
    }
}
