//! Deterministic fixed-point helpers
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Amounts of stock and money are integer units (`i64`); only prices carry
//! fractional digits. Two rounding modes exist and must never be mixed up:
//! truncation toward zero for money owed on a fill, half-away-from-zero for
//! escrow requirements and fees.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits in the canonical big-endian price encoding.
const PRICE_KEY_SCALE: u32 = 18;

/// Truncate a decimal toward zero into integer units
///
/// # Panics
/// Panics if the truncated value does not fit in `i64`; amounts that large
/// indicate corrupted state upstream.
pub fn trunc_to_i64(value: Decimal) -> i64 {
    value
        .trunc()
        .to_i64()
        .expect("truncated amount exceeds i64 range")
}

/// Round a decimal half-away-from-zero into integer units
///
/// # Panics
/// Panics if the rounded value does not fit in `i64`.
pub fn round_to_i64(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .expect("rounded amount exceeds i64 range")
}

/// Canonical big-endian encoding of a non-negative price for store keys
///
/// The mantissa is rescaled to 18 fractional digits and emitted as a 16-byte
/// big-endian integer, so byte-ordered key scans walk prices in ascending
/// numeric order. Values whose rescaled mantissa overflows 128 bits saturate;
/// the order id appended after the price keeps such keys distinct.
pub fn price_key_bytes(price: Decimal) -> [u8; 16] {
    let mantissa = price.mantissa();
    let scale = price.scale();
    let rescaled = if scale <= PRICE_KEY_SCALE {
        let factor = 10i128.pow(PRICE_KEY_SCALE - scale);
        mantissa.checked_mul(factor).unwrap_or(i128::MAX)
    } else {
        mantissa / 10i128.pow(scale - PRICE_KEY_SCALE)
    };
    (rescaled.max(0) as u128).to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trunc_toward_zero() {
        assert_eq!(trunc_to_i64(dec!(9.99)), 9);
        assert_eq!(trunc_to_i64(dec!(10.0)), 10);
        assert_eq!(trunc_to_i64(dec!(-9.99)), -9);
        assert_eq!(trunc_to_i64(dec!(0.5)), 0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to_i64(dec!(9.5)), 10);
        assert_eq!(round_to_i64(dec!(9.4)), 9);
        assert_eq!(round_to_i64(dec!(-9.5)), -10);
        assert_eq!(round_to_i64(dec!(10.0)), 10);
    }

    #[test]
    fn test_trunc_and_round_differ_at_midpoint() {
        let v = dec!(104.5);
        assert_eq!(trunc_to_i64(v), 104);
        assert_eq!(round_to_i64(v), 105);
    }

    #[test]
    fn test_price_key_ordering() {
        let a = price_key_bytes(dec!(9.99));
        let b = price_key_bytes(dec!(10));
        let c = price_key_bytes(dec!(10.000001));
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_price_key_scale_invariant() {
        // The same numeric value must encode identically regardless of the
        // scale it happens to carry.
        let one = price_key_bytes(dec!(1));
        let one_scaled = price_key_bytes(dec!(1.000));
        assert_eq!(one, one_scaled);
    }

    #[test]
    fn test_price_key_deterministic() {
        let p = dec!(50000.987654321);
        assert_eq!(price_key_bytes(p), price_key_bytes(p));
    }
}
