//! Local private-key account.
//!
//! Signs in-process with a secp256k1 key taken from the configuration.

use crate::{AccountError, AccountInterface};
use alloy_consensus::TxEnvelope;
use alloy_network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use swap_config::AccountConfig;
use swap_types::{without_0x_prefix, SecretKey};

/// Account backed by a private key held in memory.
pub struct LocalAccount {
	address: Address,
	wallet: EthereumWallet,
}

impl LocalAccount {
	pub fn new(key: &SecretKey) -> Result<Self, AccountError> {
		let signer: PrivateKeySigner = key.with_exposed(|k| {
			without_0x_prefix(k)
				.parse()
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))
		})?;
		let address = Signer::address(&signer);

		Ok(Self {
			address,
			wallet: EthereumWallet::from(signer),
		})
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.address)
	}

	async fn sign_transaction(
		&self,
		request: TransactionRequest,
	) -> Result<TxEnvelope, AccountError> {
		let request = request.with_from(self.address);
		<TransactionRequest as TransactionBuilder<Ethereum>>::build(request, &self.wallet)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))
	}
}

/// Factory function to create a local account from configuration.
pub fn create_account(config: &AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalAccount::new(&config.private_key)?))
}
