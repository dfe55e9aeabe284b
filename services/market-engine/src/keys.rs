//! Store key layout
//!
//! Byte-key builders for every record the engine reads or writes. Each key
//! family owns a one-byte prefix; composite keys terminate the pair symbol
//! with `'|'` (token symbols are alphanumeric, so prefix scans stay
//! unambiguous), and numeric components are big-endian so lexicographic key
//! order equals numeric order.

use types::ids::OrderId;
use types::numeric::price_key_bytes;
use rust_decimal::Decimal;

pub const TOKEN_PREFIX: u8 = 0x01;
pub const WHITELIST_PREFIX: u8 = 0x02;
pub const FORBID_ADDR_PREFIX: u8 = 0x03;
pub const ORDER_BOOK_PREFIX: u8 = 0x11;
pub const ORDER_HEIGHT_PREFIX: u8 = 0x12;
pub const MARKET_PREFIX: u8 = 0x20;
pub const ORDER_CLEAN_TIME_KEY: u8 = 0x21;
pub const DELIST_PREFIX: u8 = 0x30;
pub const PARAMS_KEY: u8 = 0x50;

const PAIR_TERMINATOR: u8 = b'|';

/// Scan prefix covering every order of a pair in the price index
pub fn order_book_scan_prefix(pair: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + pair.len());
    key.push(ORDER_BOOK_PREFIX);
    key.extend_from_slice(pair.as_bytes());
    key.push(PAIR_TERMINATOR);
    key
}

/// Primary order key: `0x11 | pair | '|' | price_be | order_id`
pub fn order_book_key(pair: &str, price: Decimal, order_id: &OrderId) -> Vec<u8> {
    let mut key = order_book_scan_prefix(pair);
    key.extend_from_slice(&price_key_bytes(price));
    key.extend_from_slice(order_id.to_string().as_bytes());
    key
}

/// Scan prefix covering a pair's height index
pub fn order_height_scan_prefix(pair: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + pair.len());
    key.push(ORDER_HEIGHT_PREFIX);
    key.extend_from_slice(pair.as_bytes());
    key.push(PAIR_TERMINATOR);
    key
}

/// Height index key: `0x12 | pair | '|' | height_be | order_id`
pub fn order_height_key(pair: &str, height: i64, order_id: &OrderId) -> Vec<u8> {
    let mut key = order_height_scan_prefix(pair);
    key.extend_from_slice(&(height as u64).to_be_bytes());
    key.extend_from_slice(order_id.to_string().as_bytes());
    key
}

/// Scan prefix covering one height within a pair's height index
pub fn order_height_at_prefix(pair: &str, height: i64) -> Vec<u8> {
    let mut key = order_height_scan_prefix(pair);
    key.extend_from_slice(&(height as u64).to_be_bytes());
    key
}

/// Height encoded in a height-index key, given the pair the scan used
pub fn height_from_index_key(pair: &str, key: &[u8]) -> i64 {
    let start = order_height_scan_prefix(pair).len();
    let raw: [u8; 8] = key[start..start + 8]
        .try_into()
        .expect("height index key too short");
    u64::from_be_bytes(raw) as i64
}

/// Market record key: `0x20 | symbol`
pub fn market_key(symbol: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + symbol.len());
    key.push(MARKET_PREFIX);
    key.extend_from_slice(symbol.as_bytes());
    key
}

/// Delist request key: `0x30 | time_be | symbol`
pub fn delist_key(effective_time: i64, symbol: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(9 + symbol.len());
    key.push(DELIST_PREFIX);
    key.extend_from_slice(&(effective_time as u64).to_be_bytes());
    key.extend_from_slice(symbol.as_bytes());
    key
}

/// Effective time and symbol encoded in a delist key
pub fn delist_key_parts(key: &[u8]) -> (i64, String) {
    let raw: [u8; 8] = key[1..9].try_into().expect("delist key too short");
    let time = u64::from_be_bytes(raw) as i64;
    let symbol = String::from_utf8(key[9..].to_vec()).expect("delist symbol is not utf-8");
    (time, symbol)
}

/// Token record key: `0x01 | symbol`
pub fn token_key(symbol: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + symbol.len());
    key.push(TOKEN_PREFIX);
    key.extend_from_slice(symbol.as_bytes());
    key
}

/// Whitelist entry key: `0x02 | symbol | addr`
pub fn whitelist_key(symbol: &str, addr: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + symbol.len() + addr.len());
    key.push(WHITELIST_PREFIX);
    key.extend_from_slice(symbol.as_bytes());
    key.extend_from_slice(addr.as_bytes());
    key
}

/// Forbidden address entry key: `0x03 | symbol | addr`
pub fn forbid_addr_key(symbol: &str, addr: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + symbol.len() + addr.len());
    key.push(FORBID_ADDR_PREFIX);
    key.extend_from_slice(symbol.as_bytes());
    key.extend_from_slice(addr.as_bytes());
    key
}
