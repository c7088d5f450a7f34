//! Collaborator-facing facade.
//!
//! [`SwapEngine`] is built once from configuration and shared. It accepts
//! addresses as text the way the HTTP layer receives them and converts
//! exact prices to floats only on the way out.

use crate::executor::{min_amount_out_with_slippage, SwapExecutor};
use crate::monitoring::ConfirmationPoller;
use crate::transactor::TransactorBuilder;
use crate::{EngineError, ExecutionError};
use alloy_primitives::{Address, U256};
use bigdecimal::{BigDecimal, ToPrimitive};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use swap_account::implementations::local::create_account;
use swap_account::AccountService;
use swap_config::Config;
use swap_delivery::implementations::evm::alloy::create_http_transport;
use swap_delivery::RpcTransport;
use swap_price::QuoteResolver;
use swap_types::{parse_address, truncate_id, RoutePlan};
use tokio_util::sync::CancellationToken;

/// Token price prepared for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPrice {
	pub token: Address,
	/// Exact price in the stable asset.
	pub price: BigDecimal,
	pub usd: f64,
	/// `usd` times the configured exchange rate.
	pub local: f64,
	pub local_currency: String,
	pub route: Option<RoutePlan>,
}

pub struct SwapEngine {
	config: Config,
	resolver: QuoteResolver,
	executor: SwapExecutor,
	account: Option<Arc<AccountService>>,
	local_rate: BigDecimal,
}

impl SwapEngine {
	/// Assembles the engine from an already connected transport.
	///
	/// Without an account the engine still prices tokens; swaps fail with
	/// [`ExecutionError::CredentialMissing`].
	pub fn new(
		config: Config,
		transport: Arc<dyn RpcTransport>,
		account: Option<AccountService>,
	) -> Result<Self, EngineError> {
		let local_rate = config.pricing.rate()?;
		let account = account.map(Arc::new);

		let resolver = QuoteResolver::new(transport.clone(), &config.dex);
		let transactor = TransactorBuilder::new(
			transport.clone(),
			account.clone(),
			config.execution.gas_limit,
		);
		let poller = ConfirmationPoller::new(transport.clone(), config.execution.poll_interval());
		let executor = SwapExecutor::new(
			transactor,
			transport,
			poller,
			config.dex.router,
			config.dex.wrapped_native.address,
		);

		Ok(Self {
			config,
			resolver,
			executor,
			account,
			local_rate,
		})
	}

	/// Connects to the configured node and loads the configured credential.
	pub async fn from_config(config: Config) -> Result<Self, EngineError> {
		let transport = create_http_transport(&config.network).await?;
		let account = load_account(&config)?;
		Self::new(config, transport, account)
	}

	/// Prices 10^18 base units of `token` in the stable asset and the local
	/// currency.
	pub async fn get_price(&self, token: &str) -> Result<TokenPrice, EngineError> {
		let token = parse_token(token)?;
		let quote = self.resolver.get_price(token).await?;
		let local = &quote.price * &self.local_rate;

		tracing::info!(%token, price = %quote.price, "Priced token");

		Ok(TokenPrice {
			token,
			usd: to_f64(&quote.price)?,
			local: to_f64(&local)?,
			local_currency: self.config.pricing.local_currency.clone(),
			route: quote.route,
			price: quote.price,
		})
	}

	/// Swaps native coin along `path` through the router.
	///
	/// Returns the hex hash of the mined swap.
	pub async fn swap_exact_native_for_token(
		&self,
		amount_in: U256,
		min_amount_out: U256,
		path: &[&str],
		recipient: &str,
		deadline: u64,
		cancel: &CancellationToken,
	) -> Result<String, EngineError> {
		let path = path
			.iter()
			.map(|token| parse_token(token))
			.collect::<Result<Vec<_>, _>>()?;
		let recipient = parse_token(recipient)?;

		let hash = self
			.executor
			.swap_exact_native_for_token(amount_in, min_amount_out, &path, recipient, deadline, cancel)
			.await?;
		Ok(hash.to_hex())
	}

	/// Buys `token` with `amount_in` of native coin in one direct hop.
	///
	/// The minimum output comes from a fresh quote less `slippage_bps`
	/// (configured default when `None`). The recipient defaults to the
	/// signing account and the deadline to the configured window from now.
	pub async fn buy_with_native(
		&self,
		token: &str,
		amount_in: U256,
		slippage_bps: Option<u32>,
		recipient: Option<&str>,
		cancel: &CancellationToken,
	) -> Result<String, EngineError> {
		let token = parse_token(token)?;
		let recipient = match recipient {
			Some(recipient) => parse_token(recipient)?,
			None => self.signer_address().await?,
		};
		let execution = &self.config.execution;
		let wrapped = self.config.dex.wrapped_native.address;

		let quote = self.resolver.expected_output(wrapped, token, amount_in).await?;
		let min_amount_out = min_amount_out_with_slippage(
			quote.amount_out,
			slippage_bps.unwrap_or(execution.default_slippage_bps),
			execution.max_slippage_bps,
		)?;
		let deadline = unix_now() + execution.deadline_seconds;

		tracing::info!(
			%token,
			%amount_in,
			expected_out = %quote.amount_out,
			%min_amount_out,
			fee_tier = %quote.fee_tier,
			"Buying token"
		);

		let hash = self
			.executor
			.swap_exact_native_for_token(
				amount_in,
				min_amount_out,
				&[wrapped, token],
				recipient,
				deadline,
				cancel,
			)
			.await?;
		tracing::info!(tx_hash = %truncate_id(&hash.to_hex()), "Purchase confirmed");
		Ok(hash.to_hex())
	}

	async fn signer_address(&self) -> Result<Address, EngineError> {
		let account = self
			.account
			.as_ref()
			.ok_or(ExecutionError::CredentialMissing)?;
		Ok(account.get_address().await?)
	}
}

/// Loads the signing account named by `config`, if any.
fn load_account(config: &Config) -> Result<Option<AccountService>, EngineError> {
	match &config.account {
		Some(account) => Ok(Some(AccountService::new(create_account(account)?))),
		None => Ok(None),
	}
}

fn parse_token(text: &str) -> Result<Address, EngineError> {
	parse_address(text).map_err(EngineError::InvalidAddress)
}

fn to_f64(value: &BigDecimal) -> Result<f64, EngineError> {
	value
		.to_f64()
		.filter(|v| v.is_finite())
		.ok_or_else(|| EngineError::Presentation(value.to_string()))
}

fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::executor::IUniswapV2Router02;
	use crate::transactor::tests::{DEV_ADDRESS, DEV_KEY};
	use crate::ErrorCategory;
	use alloy_consensus::Transaction;
	use alloy_sol_types::SolCall;
	use swap_config::builders::ConfigBuilder;
	use swap_delivery::implementations::mock::{MockReply, MockTransport};
	use swap_types::delivery::DEFAULT_GAS_LIMIT;
	use swap_types::FeeTier;

	const WETH: Address = Address::repeat_byte(0x0e);
	const USDT: Address = Address::repeat_byte(0x05);
	const ROUTER: Address = Address::repeat_byte(0x02);
	const TOKEN: Address = Address::repeat_byte(0xaa);
	const TOKEN_HEX: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

	fn one_token() -> U256 {
		U256::from(10u64).pow(U256::from(18u64))
	}

	fn engine(
		mock: MockTransport,
		builder: ConfigBuilder,
		with_account: bool,
	) -> (SwapEngine, Arc<MockTransport>) {
		let mock = Arc::new(mock);
		let builder = if with_account {
			builder.private_key(DEV_KEY)
		} else {
			builder
		};
		let config = builder.build();
		let account = load_account(&config).unwrap();
		let engine = SwapEngine::new(config, mock.clone(), account).unwrap();
		(engine, mock)
	}

	#[tokio::test]
	async fn test_get_price_in_local_currency() {
		let mock = MockTransport::new().with_quote(
			TOKEN,
			USDT,
			FeeTier::Medium,
			MockReply::Amount(one_token() * U256::from(2u64)),
		);
		let (engine, _) = engine(
			mock,
			ConfigBuilder::new().local_currency_rate("1500.5"),
			false,
		);

		let price = engine.get_price(TOKEN_HEX).await.unwrap();

		assert_eq!(price.token, TOKEN);
		assert_eq!(price.usd, 2.0);
		assert_eq!(price.local, 3001.0);
		assert_eq!(price.local_currency, "NGN");
		assert!(price.route.unwrap().is_direct());
	}

	#[tokio::test]
	async fn test_get_price_errors_are_classified() {
		let (engine, mock) = engine(MockTransport::new(), ConfigBuilder::new(), false);

		let err = engine.get_price("0x1234").await.unwrap_err();
		assert_eq!(err.category(), ErrorCategory::BadRequest);
		assert_eq!(mock.rpc_calls(), 0);

		let err = engine.get_price(TOKEN_HEX).await.unwrap_err();
		assert_eq!(err.category(), ErrorCategory::NoLiquidity);
		assert_eq!(err.http_status(), 503);
	}

	#[tokio::test]
	async fn test_stable_price_needs_no_rpc() {
		let (engine, mock) = engine(MockTransport::new(), ConfigBuilder::new(), false);

		let price = engine
			.get_price("0x0505050505050505050505050505050505050505")
			.await
			.unwrap();
		assert_eq!(price.usd, 1.0);
		assert!(price.route.is_none());
		assert_eq!(mock.rpc_calls(), 0);
	}

	#[tokio::test]
	async fn test_swap_without_router() {
		let (engine, mock) = engine(MockTransport::new(), ConfigBuilder::new().router(None), true);

		let err = engine
			.swap_exact_native_for_token(
				one_token(),
				U256::ZERO,
				&["0x0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e", TOKEN_HEX],
				TOKEN_HEX,
				1_700_000_000,
				&CancellationToken::new(),
			)
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			EngineError::Execution(ExecutionError::RouterUninitialized)
		));
		assert_eq!(mock.rpc_calls(), 0);
	}

	#[tokio::test]
	async fn test_swap_returns_hex_hash() {
		let (engine, mock) = engine(MockTransport::new(), ConfigBuilder::new(), true);

		let hash = engine
			.swap_exact_native_for_token(
				one_token(),
				U256::from(1u64),
				&["0x0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e", TOKEN_HEX],
				TOKEN_HEX,
				1_700_000_000,
				&CancellationToken::new(),
			)
			.await
			.unwrap();

		let sent = mock.sent_transactions();
		assert_eq!(hash, format!("{}", sent[0].tx_hash()));
		assert_eq!(hash.len(), 66);
		assert_eq!(sent[0].gas_limit(), DEFAULT_GAS_LIMIT);
	}

	#[tokio::test]
	async fn test_swap_uses_configured_gas_limit() {
		let (engine, mock) = engine(
			MockTransport::new(),
			ConfigBuilder::new().gas_limit(450_000),
			true,
		);

		engine
			.swap_exact_native_for_token(
				one_token(),
				U256::from(1u64),
				&["0x0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e", TOKEN_HEX],
				TOKEN_HEX,
				1_700_000_000,
				&CancellationToken::new(),
			)
			.await
			.unwrap();

		assert_eq!(mock.sent_transactions()[0].gas_limit(), 450_000);
	}

	#[tokio::test]
	async fn test_buy_with_native() {
		let mock = MockTransport::new()
			.with_quote(WETH, TOKEN, FeeTier::Medium, MockReply::Revert)
			.with_quote(
				WETH,
				TOKEN,
				FeeTier::High,
				MockReply::Amount(U256::from(40_000u64)),
			);
		let (engine, mock) = engine(mock, ConfigBuilder::new(), true);
		let before = unix_now();

		engine
			.buy_with_native(TOKEN_HEX, one_token(), Some(100), None, &CancellationToken::new())
			.await
			.unwrap();

		let sent = mock.sent_transactions();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].to(), Some(ROUTER));
		assert_eq!(sent[0].value(), one_token());

		let call =
			IUniswapV2Router02::swapExactETHForTokensCall::abi_decode(sent[0].input()).unwrap();
		assert_eq!(call.amountOutMin, U256::from(39_600u64));
		assert_eq!(call.path, vec![WETH, TOKEN]);
		assert_eq!(call.to, DEV_ADDRESS);
		assert!(call.deadline >= U256::from(before + 1_200));
	}

	#[tokio::test]
	async fn test_buy_with_excessive_slippage() {
		let mock = MockTransport::new().with_quote(
			WETH,
			TOKEN,
			FeeTier::Medium,
			MockReply::Amount(U256::from(40_000u64)),
		);
		let (engine, mock) = engine(mock, ConfigBuilder::new(), true);

		let err = engine
			.buy_with_native(TOKEN_HEX, one_token(), Some(600), None, &CancellationToken::new())
			.await
			.unwrap_err();

		assert_eq!(err.http_status(), 400);
		assert!(mock.sent_transactions().is_empty());
	}

	#[tokio::test]
	async fn test_buy_without_credential() {
		let (engine, _) = engine(MockTransport::new(), ConfigBuilder::new(), false);

		let err = engine
			.buy_with_native(TOKEN_HEX, one_token(), None, None, &CancellationToken::new())
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			EngineError::Execution(ExecutionError::CredentialMissing)
		));
		assert_eq!(err.category(), ErrorCategory::Unavailable);
	}

	#[tokio::test]
	async fn test_reverted_purchase_maps_to_422() {
		let mock = MockTransport::new()
			.with_quote(
				WETH,
				TOKEN,
				FeeTier::Medium,
				MockReply::Amount(U256::from(40_000u64)),
			)
			.with_receipt_after(0, false);
		let (engine, _) = engine(mock, ConfigBuilder::new(), true);

		let err = engine
			.buy_with_native(TOKEN_HEX, one_token(), None, None, &CancellationToken::new())
			.await
			.unwrap_err();
		assert_eq!(err.category(), ErrorCategory::Reverted);
		assert_eq!(err.http_status(), 422);
	}

	#[tokio::test]
	async fn test_invalid_rate_is_rejected() {
		let config = ConfigBuilder::new().local_currency_rate("abc").build();
		let result = SwapEngine::new(config, Arc::new(MockTransport::new()), None);
		assert!(matches!(result, Err(EngineError::Config(_))));
	}
}
