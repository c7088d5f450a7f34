//! RPC transport module for the swap engine.
//!
//! Every component reaches the chain through [`RpcTransport`]: contract
//! reads for quoting, account and gas queries for signing, broadcast and
//! receipt lookups for swaps. Implementations must be safe to share
//! between concurrent tasks.

use alloy_consensus::TxEnvelope;
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use swap_types::{TransactionHash, TransactionReceipt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	#[cfg(any(test, feature = "testing"))]
	pub mod mock;
}

/// Marker the node puts in the error of a call that reverted.
const EXECUTION_REVERTED: &str = "execution reverted";

/// Errors that can occur while talking to the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The call reached the node and the contract reverted.
	#[error("Execution reverted: {0}")]
	ExecutionReverted(String),
	/// The node answered with something that could not be interpreted.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// The transport could not be set up from its configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl TransportError {
	/// Sorts a node error message into a revert or a network failure.
	pub fn from_rpc_message(message: String) -> Self {
		if message.to_ascii_lowercase().contains(EXECUTION_REVERTED) {
			TransportError::ExecutionReverted(message)
		} else {
			TransportError::Network(message)
		}
	}

	pub fn is_execution_reverted(&self) -> bool {
		matches!(self, TransportError::ExecutionReverted(_))
	}
}

/// Trait defining the chain operations the engine relies on.
#[async_trait]
pub trait RpcTransport: Send + Sync {
	/// Executes a read-only contract call and returns the raw return data.
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, TransportError>;

	/// Chain id reported by the node.
	async fn chain_id(&self) -> Result<u64, TransportError>;

	/// Next nonce for `account`, counting transactions still in the mempool.
	async fn pending_nonce(&self, account: Address) -> Result<u64, TransportError>;

	/// Suggested gas price in wei.
	async fn gas_price(&self) -> Result<u128, TransportError>;

	/// Broadcasts a signed transaction.
	async fn send_transaction(&self, envelope: TxEnvelope)
		-> Result<TransactionHash, TransportError>;

	/// Receipt of a mined transaction, `None` while it is still pending.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, TransportError>;
}
