//! Scripted in-memory transport for tests.
//!
//! Quote calls are decoded and answered from a table keyed by
//! `(token_in, token_out, fee_tier)`; pairs without an entry revert like a
//! missing pool would. Every call is recorded so tests can assert on the
//! exact probing order.

use crate::{RpcTransport, TransportError};
use alloy_consensus::TxEnvelope;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use swap_types::{decode_quote_call, FeeTier, QuoteCall, TransactionHash, TransactionReceipt};

/// Scripted answer to a quote call.
#[derive(Debug, Clone)]
pub enum MockReply {
	/// Returns the amount as a single ABI word.
	Amount(U256),
	/// Fails with an `execution reverted` error.
	Revert,
	/// Fails with a network error.
	Fail(String),
	/// Returns the bytes verbatim.
	Raw(Bytes),
}

/// How the mocked chain answers receipt lookups.
#[derive(Debug, Clone, Copy)]
enum ReceiptScript {
	/// Never mined.
	Never,
	/// Mined after `pending` lookups returned nothing.
	After { pending: usize, success: bool },
}

pub struct MockTransport {
	quotes: HashMap<(Address, Address, FeeTier), MockReply>,
	chain_id: Result<u64, TransportError>,
	nonce: Result<u64, TransportError>,
	gas_price: Result<u128, TransportError>,
	send_error: Option<TransportError>,
	receipt: ReceiptScript,
	receipt_failures: usize,
	quote_log: Mutex<Vec<QuoteCall>>,
	sent: Mutex<Vec<TxEnvelope>>,
	receipt_polls: AtomicUsize,
	rpc_calls: AtomicUsize,
}

impl Default for MockTransport {
	fn default() -> Self {
		Self::new()
	}
}

impl MockTransport {
	/// Chain 56, nonce 0, 5 gwei, receipts mined successfully on first lookup.
	pub fn new() -> Self {
		Self {
			quotes: HashMap::new(),
			chain_id: Ok(56),
			nonce: Ok(0),
			gas_price: Ok(5_000_000_000),
			send_error: None,
			receipt: ReceiptScript::After {
				pending: 0,
				success: true,
			},
			receipt_failures: 0,
			quote_log: Mutex::new(Vec::new()),
			sent: Mutex::new(Vec::new()),
			receipt_polls: AtomicUsize::new(0),
			rpc_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_quote(
		mut self,
		token_in: Address,
		token_out: Address,
		fee_tier: FeeTier,
		reply: MockReply,
	) -> Self {
		self.quotes.insert((token_in, token_out, fee_tier), reply);
		self
	}

	pub fn with_chain_id(mut self, chain_id: Result<u64, TransportError>) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn with_nonce(mut self, nonce: Result<u64, TransportError>) -> Self {
		self.nonce = nonce;
		self
	}

	pub fn with_gas_price(mut self, gas_price: Result<u128, TransportError>) -> Self {
		self.gas_price = gas_price;
		self
	}

	pub fn with_send_error(mut self, error: TransportError) -> Self {
		self.send_error = Some(error);
		self
	}

	/// Receipt appears after `pending` empty lookups.
	pub fn with_receipt_after(mut self, pending: usize, success: bool) -> Self {
		self.receipt = ReceiptScript::After { pending, success };
		self
	}

	/// First `failures` receipt lookups fail with a network error.
	pub fn with_receipt_failures(mut self, failures: usize) -> Self {
		self.receipt_failures = failures;
		self
	}

	pub fn never_mined(mut self) -> Self {
		self.receipt = ReceiptScript::Never;
		self
	}

	/// Quote calls received, in order.
	pub fn quote_calls(&self) -> Vec<QuoteCall> {
		self.quote_log.lock().map(|log| log.clone()).unwrap_or_default()
	}

	/// Fee tiers queried for one pair, in order.
	pub fn tiers_queried(&self, token_in: Address, token_out: Address) -> Vec<FeeTier> {
		self.quote_calls()
			.into_iter()
			.filter(|call| call.token_in == token_in && call.token_out == token_out)
			.map(|call| call.fee_tier)
			.collect()
	}

	pub fn sent_transactions(&self) -> Vec<TxEnvelope> {
		self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
	}

	pub fn receipt_polls(&self) -> usize {
		self.receipt_polls.load(Ordering::SeqCst)
	}

	/// Total number of transport operations invoked.
	pub fn rpc_calls(&self) -> usize {
		self.rpc_calls.load(Ordering::SeqCst)
	}

	fn touch(&self) {
		self.rpc_calls.fetch_add(1, Ordering::SeqCst);
	}
}

#[async_trait]
impl RpcTransport for MockTransport {
	async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, TransportError> {
		self.touch();
		let call = decode_quote_call(&data)
			.map_err(|e| TransportError::InvalidResponse(format!("unexpected call: {}", e)))?;
		if let Ok(mut log) = self.quote_log.lock() {
			log.push(call.clone());
		}

		match self
			.quotes
			.get(&(call.token_in, call.token_out, call.fee_tier))
			.cloned()
			.unwrap_or(MockReply::Revert)
		{
			MockReply::Amount(amount) => Ok(Bytes::from(amount.to_be_bytes::<32>().to_vec())),
			MockReply::Revert => Err(TransportError::ExecutionReverted(
				"execution reverted".to_string(),
			)),
			MockReply::Fail(message) => Err(TransportError::Network(message)),
			MockReply::Raw(bytes) => Ok(bytes),
		}
	}

	async fn chain_id(&self) -> Result<u64, TransportError> {
		self.touch();
		self.chain_id.clone()
	}

	async fn pending_nonce(&self, _account: Address) -> Result<u64, TransportError> {
		self.touch();
		self.nonce.clone()
	}

	async fn gas_price(&self) -> Result<u128, TransportError> {
		self.touch();
		self.gas_price.clone()
	}

	async fn send_transaction(
		&self,
		envelope: TxEnvelope,
	) -> Result<TransactionHash, TransportError> {
		self.touch();
		if let Some(error) = &self.send_error {
			return Err(error.clone());
		}
		let hash = TransactionHash(*envelope.tx_hash());
		if let Ok(mut sent) = self.sent.lock() {
			sent.push(envelope);
		}
		Ok(hash)
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, TransportError> {
		self.touch();
		let polls = self.receipt_polls.fetch_add(1, Ordering::SeqCst);
		if polls < self.receipt_failures {
			return Err(TransportError::Network("receipt lookup timed out".to_string()));
		}
		let polls = polls - self.receipt_failures;
		match self.receipt {
			ReceiptScript::Never => Ok(None),
			ReceiptScript::After { pending, .. } if polls < pending => Ok(None),
			ReceiptScript::After { success, .. } => Ok(Some(TransactionReceipt {
				hash: *hash,
				block_number: 1_000 + polls as u64,
				success,
			})),
		}
	}
}
