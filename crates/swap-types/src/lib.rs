//! Common types module for the swap engine.
//!
//! This module defines the shared data types used throughout the engine:
//! pool fee tiers, route plans, signing contexts, transaction receipts and
//! the fixed-layout ABI codec used on the quoting path.

/// Fixed-layout call encoding and return decoding for the quoter contract.
pub mod abi;
/// Transaction lifecycle types for blockchain interactions.
pub mod delivery;
/// Pool fee tiers and their trial orderings.
pub mod fee;
/// Route legs, route plans and quotes.
pub mod route;
/// Redacting wrapper for key material.
pub mod secret;
/// Utility functions for common type conversions.
pub mod utils;

pub use abi::{
	decode_amount, decode_amount_bytes, decode_quote_call, encode_quote_call,
	encode_quote_call_checked, quote_selector, AbiError, QuoteCall, WordBuffer,
	QUOTE_CALL_LEN, QUOTE_EXACT_INPUT_SINGLE,
};
pub use delivery::{SigningContext, TransactionHash, TransactionReceipt};
pub use fee::{FeeTier, FEE_TIER_FALLBACK, FEE_TIER_ORDER};
pub use route::{Quote, RouteError, RouteLeg, RoutePlan};
pub use secret::SecretKey;
pub use utils::{
	parse_address, scale_down, truncate_id, u256_to_bigint, with_0x_prefix, without_0x_prefix,
};

/// Token amounts in base units.
///
/// The on-chain ceiling for every amount is 256 bits; arithmetic that could
/// exceed it is done on [`num_bigint::BigInt`] / [`bigdecimal::BigDecimal`].
pub type Amount = alloy_primitives::U256;

pub use alloy_primitives::Address;
