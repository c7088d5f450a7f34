//! Alloy-based JSON-RPC transport.
//!
//! Talks to an EVM node over HTTP. Signing happens before the transport is
//! involved, so broadcasts go out as raw signed envelopes.

use crate::{RpcTransport, TransportError};
use alloy_consensus::TxEnvelope;
use alloy_network::{ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use swap_config::NetworkConfig;
use swap_types::{truncate_id, TransactionHash, TransactionReceipt};

/// HTTP transport backed by an alloy provider.
#[derive(Clone)]
pub struct AlloyTransport {
	provider: DynProvider,
}

impl AlloyTransport {
	/// Connects to `rpc_url`.
	///
	/// When `expected_chain_id` is set the node is asked for its chain id and
	/// a mismatch is a configuration error.
	pub async fn new(rpc_url: &str, expected_chain_id: Option<u64>) -> Result<Self, TransportError> {
		let url = rpc_url
			.parse()
			.map_err(|e| TransportError::Configuration(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new().connect_http(url).erased();
		let transport = Self { provider };

		if let Some(expected) = expected_chain_id {
			let actual = transport.chain_id().await?;
			if actual != expected {
				return Err(TransportError::Configuration(format!(
					"RPC endpoint serves chain {}, expected {}",
					actual, expected
				)));
			}
		}

		Ok(transport)
	}
}

#[async_trait]
impl RpcTransport for AlloyTransport {
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, TransportError> {
		let request = TransactionRequest::default().with_to(to).with_input(data);
		self.provider
			.call(request)
			.await
			.map_err(|e| TransportError::from_rpc_message(e.to_string()))
	}

	async fn chain_id(&self) -> Result<u64, TransportError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| TransportError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn pending_nonce(&self, account: Address) -> Result<u64, TransportError> {
		self.provider
			.get_transaction_count(account)
			.pending()
			.await
			.map_err(|e| TransportError::Network(format!("Failed to get nonce: {}", e)))
	}

	async fn gas_price(&self) -> Result<u128, TransportError> {
		self.provider
			.get_gas_price()
			.await
			.map_err(|e| TransportError::Network(format!("Failed to get gas price: {}", e)))
	}

	async fn send_transaction(
		&self,
		envelope: TxEnvelope,
	) -> Result<TransactionHash, TransportError> {
		let pending = self
			.provider
			.send_tx_envelope(envelope)
			.await
			.map_err(|e| TransportError::from_rpc_message(e.to_string()))?;

		let hash = TransactionHash(*pending.tx_hash());
		tracing::info!(tx_hash = %truncate_id(&hash.to_hex()), "Submitted transaction");
		Ok(hash)
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, TransportError> {
		let receipt = self
			.provider
			.get_transaction_receipt(hash.0)
			.await
			.map_err(|e| TransportError::Network(format!("Failed to get receipt: {}", e)))?;

		Ok(receipt.map(|receipt| TransactionReceipt {
			hash: TransactionHash(ReceiptResponse::transaction_hash(&receipt)),
			block_number: ReceiptResponse::block_number(&receipt).unwrap_or(0),
			success: ReceiptResponse::status(&receipt),
		}))
	}
}

/// Factory function to create the HTTP transport from configuration.
pub async fn create_http_transport(
	config: &NetworkConfig,
) -> Result<Arc<dyn RpcTransport>, TransportError> {
	let transport = AlloyTransport::new(&config.rpc_url, config.chain_id).await?;
	Ok(Arc::new(transport))
}
