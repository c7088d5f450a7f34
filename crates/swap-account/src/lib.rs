//! Account management module for the swap engine.
//!
//! Holds the credential swaps are signed with. The credential is read-only
//! after construction and safe to share between concurrent swaps.

use alloy_consensus::TxEnvelope;
use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for account implementations.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Address derived from the credential's public key.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a fully populated transaction request.
	///
	/// The request must carry nonce, gas parameters and chain id; the
	/// returned envelope is ready for broadcast.
	async fn sign_transaction(&self, request: TransactionRequest)
		-> Result<TxEnvelope, AccountError>;
}

/// Service wrapping the configured account implementation.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address associated with the managed account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs a transaction using the managed account.
	pub async fn sign(&self, request: TransactionRequest) -> Result<TxEnvelope, AccountError> {
		self.implementation.sign_transaction(request).await
	}
}
