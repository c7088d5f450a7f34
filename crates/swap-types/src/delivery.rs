//! Transaction lifecycle types.
//!
//! This module defines the signing context a transaction is built from, and
//! the hash and receipt types used to follow it until it is mined.

use crate::utils::with_0x_prefix;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default gas limit applied to every swap transaction.
pub const DEFAULT_GAS_LIMIT: u64 = 3_000_000;

/// Hash identifying a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub B256);

impl TransactionHash {
	/// Lowercase `0x`-prefixed hex form handed to callers.
	pub fn to_hex(&self) -> String {
		with_0x_prefix(&hex::encode(self.0))
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl From<B256> for TransactionHash {
	fn from(hash: B256) -> Self {
		Self(hash)
	}
}

/// Transaction receipt containing execution details.
///
/// A receipt only tells that the transaction was mined; `success` tells
/// whether it executed or reverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// Everything needed to sign one transaction from the engine's account.
///
/// Built fresh for every transaction: the nonce is read from the network
/// each time and is never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
	/// Sending account, derived from the credential.
	pub account: Address,
	/// Pending-inclusive next nonce of `account`.
	pub nonce: u64,
	pub gas_limit: u64,
	/// Suggested gas price in wei.
	pub gas_price: u128,
	pub chain_id: u64,
	/// Native value sent along with the call. Zero unless overridden.
	pub value: U256,
}

impl SigningContext {
	/// Returns the context with the native value overridden.
	pub fn with_value(mut self, value: U256) -> Self {
		self.value = value;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transaction_hash_hex() {
		let hash = TransactionHash(B256::repeat_byte(0xab));
		let text = hash.to_hex();
		assert_eq!(text.len(), 66);
		assert!(text.starts_with("0xabab"));
		assert_eq!(hash.to_string(), text);
	}
}
