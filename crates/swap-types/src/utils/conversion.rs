//! Conversions between on-chain integers, addresses and decimal prices.

use super::formatting::with_0x_prefix;
use alloy_primitives::{Address, U256};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

/// Parses a hex address, with or without `0x`.
///
/// Returns the parser's message on failure so callers can wrap it in their
/// own error type.
pub fn parse_address(text: &str) -> Result<Address, String> {
	with_0x_prefix(text.trim())
		.parse::<Address>()
		.map_err(|e| format!("invalid address '{}': {}", text, e))
}

/// Lifts a 256-bit amount into an unbounded integer.
pub fn u256_to_bigint(value: U256) -> BigInt {
	BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

/// Exact decimal value of `amount / 10^decimals`.
pub fn scale_down(amount: U256, decimals: u8) -> BigDecimal {
	BigDecimal::new(u256_to_bigint(amount), decimals as i64)
}
