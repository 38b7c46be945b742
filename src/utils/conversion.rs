//! Type conversion and formatting utilities.
//!
//! Address/hex helpers for entity identities and `BigDecimal` helpers for
//! turning raw on-chain integer amounts into decimal-adjusted quantities.

use alloy::primitives::{hex, Address};
use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use once_cell::sync::Lazy;
use std::str::FromStr;

// ============================================
// Hex Encoding
// ============================================

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse an entity identity (hex address string) into an alloy `Address`.
///
/// Accepts upper, lower or mixed case, with or without the 0x prefix.
pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim()).with_context(|| format!("Invalid address: {value}"))
}

/// Canonical identity for an address: lowercase hex with 0x prefix.
pub fn address_id(address: &Address) -> String {
    hex_encode(address.as_slice())
}

// ============================================
// Decimal Conversions
// ============================================

/// Convert a raw integer token amount (as emitted on-chain) into a
/// decimal-adjusted `BigDecimal`.
///
/// # Arguments
/// * `raw_amount` - The raw amount as an unsigned base-10 integer string
/// * `decimals` - The token's decimal places
///
/// # Returns
/// * `Some(amount)` if the string parses as an unsigned integer, `None` otherwise
///
/// # Example
/// ```ignore
/// let amount = convert_token_to_decimal("1500000000000000000", 18); // 1.5
/// ```
pub fn convert_token_to_decimal(raw_amount: &str, decimals: u8) -> Option<BigDecimal> {
    // On-chain amounts are uints; a sign is never valid here
    let raw = BigUint::from_str(raw_amount.trim()).ok()?;
    let value = BigDecimal::from(BigInt::from(raw));

    if decimals == 0 {
        return Some(value);
    }

    Some(value / big_pow10(decimals))
}

/// Divide `numerator` by `denominator`, returning zero when the denominator is zero.
pub fn safe_div(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    if denominator.is_zero() {
        BigDecimal::zero()
    } else {
        numerator / denominator
    }
}

// ============================================
// Internal Helpers
// ============================================

static POW10_CACHE: Lazy<[BigDecimal; 25]> =
    Lazy::new(|| std::array::from_fn(|i| BigDecimal::from(BigInt::from(10u32).pow(i as u32))));

/// Compute 10^exp as BigDecimal.
pub(crate) fn big_pow10(exp: u8) -> BigDecimal {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigDecimal::from(BigInt::from(10u32).pow(exp as u32))
    }
}
