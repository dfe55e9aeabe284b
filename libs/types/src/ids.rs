//! Identifier types for engine entities
//!
//! Identities are value-derived rather than generated: an order is keyed by
//! its sender and per-sender sequence number, so identical inputs produce
//! identical identifiers on every replica.

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque account address
///
/// The engine never inspects address contents; it only compares, orders,
/// and forwards them to the balance keeper.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for an order: sender address plus per-sender sequence
///
/// Serialized as the stable string `"<sender>-<sequence>"`; keepers and the
/// per-pass order maps key on that string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId {
    pub sender: Address,
    pub sequence: u64,
}

impl OrderId {
    pub fn new(sender: Address, sequence: u64) -> Self {
        Self { sender, sequence }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.sender, self.sequence)
    }
}

impl FromStr for OrderId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sender, sequence) = s
            .rsplit_once('-')
            .ok_or_else(|| ParseError::OrderId(s.to_string()))?;
        let sequence = sequence
            .parse::<u64>()
            .map_err(|_| ParseError::OrderId(s.to_string()))?;
        if sender.is_empty() {
            return Err(ParseError::OrderId(s.to_string()));
        }
        Ok(Self::new(Address::new(sender), sequence))
    }
}

impl Serialize for OrderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Trading pair identifier
///
/// Format: "STOCK/MONEY" (e.g., "ABC/USD")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradingPair(String);

impl TradingPair {
    /// Create a new TradingPair from a symbol string
    ///
    /// # Panics
    /// Panics if the format is invalid (must contain '/')
    pub fn new(symbol: impl Into<String>) -> Self {
        let s = symbol.into();
        assert!(s.contains('/'), "TradingPair must be in STOCK/MONEY format");
        Self(s)
    }

    /// Try to create a TradingPair, returning None if invalid
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        let s = symbol.into();
        if s.contains('/') {
            Some(Self(s))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into stock and money denominations
    pub fn split(&self) -> (&str, &str) {
        let (stock, money) = self.0.split_once('/').expect("validated at construction");
        (stock, money)
    }

    pub fn stock(&self) -> &str {
        self.split().0
    }

    pub fn money(&self) -> &str {
        self.split().1
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TradingPair {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl FromStr for TradingPair {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s).ok_or_else(|| ParseError::TradingPair(s.to_string()))
    }
}
