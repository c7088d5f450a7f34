//! Signing context assembly.
//!
//! Collects everything a transaction needs before it can be signed: chain
//! id, sender, nonce and gas price. Each lookup is a separate failure point
//! with its own error.

use crate::ExecutionError;
use alloy_consensus::TxEnvelope;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types::TransactionRequest;
use std::sync::Arc;
use swap_account::AccountService;
use swap_delivery::RpcTransport;
use swap_types::SigningContext;

pub struct TransactorBuilder {
	transport: Arc<dyn RpcTransport>,
	account: Option<Arc<AccountService>>,
	gas_limit: u64,
}

impl TransactorBuilder {
	pub fn new(
		transport: Arc<dyn RpcTransport>,
		account: Option<Arc<AccountService>>,
		gas_limit: u64,
	) -> Self {
		Self {
			transport,
			account,
			gas_limit,
		}
	}

	/// Builds a fresh context for one transaction.
	///
	/// Lookups run in order: chain id, sender address, pending nonce, gas
	/// price. The value starts at zero and the gas limit comes from
	/// configuration.
	///
	/// Nonces are read from the node every time and never reserved locally,
	/// so two swaps from the same account started at once can be handed the
	/// same nonce.
	pub async fn build_signing_context(&self) -> Result<SigningContext, ExecutionError> {
		let account = self.credential()?;

		let chain_id = self
			.transport
			.chain_id()
			.await
			.map_err(ExecutionError::ChainId)?;
		let address = account.get_address().await?;
		let nonce = self
			.transport
			.pending_nonce(address)
			.await
			.map_err(ExecutionError::Nonce)?;
		let gas_price = self
			.transport
			.gas_price()
			.await
			.map_err(ExecutionError::GasPrice)?;

		tracing::debug!(%address, chain_id, nonce, gas_price, "Built signing context");

		Ok(SigningContext {
			account: address,
			nonce,
			gas_limit: self.gas_limit,
			gas_price,
			chain_id,
			value: U256::ZERO,
		})
	}

	/// Signs a legacy gas-price transaction from `context` calling `to`.
	pub async fn sign(
		&self,
		context: &SigningContext,
		to: Address,
		input: Bytes,
	) -> Result<TxEnvelope, ExecutionError> {
		let account = self.credential()?;

		let request = TransactionRequest::default()
			.with_from(context.account)
			.with_to(to)
			.with_nonce(context.nonce)
			.with_chain_id(context.chain_id)
			.with_gas_limit(context.gas_limit)
			.with_gas_price(context.gas_price)
			.with_value(context.value)
			.with_input(input);

		Ok(account.sign(request).await?)
	}

	fn credential(&self) -> Result<&AccountService, ExecutionError> {
		self.account
			.as_deref()
			.ok_or(ExecutionError::CredentialMissing)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use alloy_consensus::Transaction;
	use alloy_primitives::address;
	use swap_account::implementations::local::LocalAccount;
	use swap_delivery::implementations::mock::MockTransport;
	use swap_delivery::TransportError;
	use swap_types::delivery::DEFAULT_GAS_LIMIT;
	use swap_types::SecretKey;

	pub(crate) const DEV_KEY: &str =
		"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	pub(crate) const DEV_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

	pub(crate) fn dev_account() -> Arc<AccountService> {
		let account = LocalAccount::new(&SecretKey::new(DEV_KEY)).unwrap();
		Arc::new(AccountService::new(Box::new(account)))
	}

	fn transactor(mock: MockTransport) -> (TransactorBuilder, Arc<MockTransport>) {
		let mock = Arc::new(mock);
		let builder = TransactorBuilder::new(mock.clone(), Some(dev_account()), DEFAULT_GAS_LIMIT);
		(builder, mock)
	}

	fn network(message: &str) -> TransportError {
		TransportError::Network(message.to_string())
	}

	#[tokio::test]
	async fn test_context_defaults() {
		let (builder, _) = transactor(
			MockTransport::new()
				.with_nonce(Ok(7))
				.with_gas_price(Ok(3_000_000_000)),
		);

		let context = builder.build_signing_context().await.unwrap();

		assert_eq!(context.account, DEV_ADDRESS);
		assert_eq!(context.chain_id, 56);
		assert_eq!(context.nonce, 7);
		assert_eq!(context.gas_price, 3_000_000_000);
		assert_eq!(context.gas_limit, 3_000_000);
		assert_eq!(context.value, U256::ZERO);
	}

	#[tokio::test]
	async fn test_each_lookup_has_its_own_error() {
		let (builder, _) = transactor(MockTransport::new().with_chain_id(Err(network("down"))));
		let err = builder.build_signing_context().await.unwrap_err();
		assert!(matches!(err, ExecutionError::ChainId(_)));
		assert!(err.to_string().starts_with("failed to get chain id"));

		let (builder, _) = transactor(MockTransport::new().with_nonce(Err(network("down"))));
		let err = builder.build_signing_context().await.unwrap_err();
		assert!(matches!(err, ExecutionError::Nonce(_)));
		assert!(err.to_string().starts_with("failed to get nonce"));

		let (builder, _) = transactor(MockTransport::new().with_gas_price(Err(network("down"))));
		let err = builder.build_signing_context().await.unwrap_err();
		assert!(matches!(err, ExecutionError::GasPrice(_)));
		assert!(err.to_string().starts_with("failed to get gas price"));
	}

	#[tokio::test]
	async fn test_missing_credential() {
		let mock = Arc::new(MockTransport::new());
		let builder = TransactorBuilder::new(mock.clone(), None, DEFAULT_GAS_LIMIT);

		let err = builder.build_signing_context().await.unwrap_err();
		assert!(matches!(err, ExecutionError::CredentialMissing));
		assert_eq!(err.to_string(), "credential not initialized");
		assert_eq!(mock.rpc_calls(), 0);
	}

	#[tokio::test]
	async fn test_sign_uses_context() {
		let (builder, _) = transactor(MockTransport::new().with_nonce(Ok(12)));
		let router = Address::repeat_byte(0x02);

		let context = builder
			.build_signing_context()
			.await
			.unwrap()
			.with_value(U256::from(5_000u64));
		let envelope = builder
			.sign(&context, router, Bytes::from(vec![0x7f, 0xf3, 0x6a, 0xb5]))
			.await
			.unwrap();

		assert!(envelope.is_legacy());
		assert_eq!(envelope.nonce(), 12);
		assert_eq!(envelope.chain_id(), Some(56));
		assert_eq!(envelope.gas_limit(), DEFAULT_GAS_LIMIT);
		assert_eq!(envelope.gas_price(), Some(5_000_000_000));
		assert_eq!(envelope.value(), U256::from(5_000u64));
		assert_eq!(envelope.to(), Some(router));
	}
}
