//! Configuration module for the swap engine.
//!
//! The configuration is read once from a TOML file, environment variables
//! are substituted, and the result is validated before any component is
//! built from it. Components receive the parsed value explicitly; nothing
//! reads configuration from global state.

#[cfg(any(test, feature = "testing"))]
pub mod builders;

use alloy_primitives::Address;
use bigdecimal::{BigDecimal, Zero};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use swap_types::{FeeTier, SecretKey};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only; the default rendering echoes the whole input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the swap engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// RPC endpoint of the chain the exchange is deployed on.
	pub network: NetworkConfig,
	/// Exchange contracts and the tokens used for routing.
	pub dex: DexConfig,
	/// Presentation of prices in the local currency.
	#[serde(default)]
	pub pricing: PricingConfig,
	/// Gas, confirmation and slippage settings for swaps.
	#[serde(default)]
	pub execution: ExecutionConfig,
	/// Signing credential. Read-only deployments leave it out.
	#[serde(default)]
	pub account: Option<AccountConfig>,
}

/// Network connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint.
	pub rpc_url: String,
	/// Expected chain id. When set, the transport refuses to start against
	/// a node reporting a different chain.
	pub chain_id: Option<u64>,
}

/// A token the engine needs to know the scale of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TokenConfig {
	pub address: Address,
	pub symbol: String,
	/// Base-unit scale, defaults to 18.
	#[serde(default = "default_decimals")]
	pub decimals: u8,
}

/// Exchange deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DexConfig {
	/// Quoter contract answering `quoteExactInputSingle`.
	pub quoter: Address,
	/// Swap router. Without it the engine is quote-only.
	pub router: Option<Address>,
	/// Wrapped native token, used as the intermediate routing asset.
	pub wrapped_native: TokenConfig,
	/// Reference stablecoin prices are expressed in.
	pub stable: TokenConfig,
	/// Platform token priced with the best-of-all-tiers policy.
	pub sale_token: Option<Address>,
	/// Pool used for the intermediate to stable leg of two-hop prices.
	#[serde(default = "default_intermediate_stable_fee_tier")]
	pub intermediate_stable_fee_tier: FeeTier,
}

/// Local currency conversion applied on top of stablecoin prices.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
	/// Currency code shown next to local prices.
	#[serde(default = "default_local_currency")]
	pub local_currency: String,
	/// Units of local currency per unit of the stable asset, as a decimal
	/// string to keep full precision.
	#[serde(default = "default_local_currency_rate")]
	pub local_currency_rate: String,
}

impl Default for PricingConfig {
	fn default() -> Self {
		Self {
			local_currency: default_local_currency(),
			local_currency_rate: default_local_currency_rate(),
		}
	}
}

impl PricingConfig {
	/// Parsed exchange rate. Validation guarantees it is a positive decimal.
	pub fn rate(&self) -> Result<BigDecimal, ConfigError> {
		BigDecimal::from_str(self.local_currency_rate.trim()).map_err(|e| {
			ConfigError::Validation(format!(
				"local_currency_rate '{}' is not a decimal: {}",
				self.local_currency_rate, e
			))
		})
	}
}

/// Swap submission settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
	/// Gas limit for every swap transaction.
	#[serde(default = "default_gas_limit")]
	pub gas_limit: u64,
	/// Delay between receipt lookups while waiting for a swap to be mined.
	#[serde(default = "default_confirmation_poll_interval_ms")]
	pub confirmation_poll_interval_ms: u64,
	/// Slippage applied when the caller does not pass one, in basis points.
	#[serde(default = "default_slippage_bps")]
	pub default_slippage_bps: u32,
	/// Upper bound on caller-provided slippage, in basis points.
	#[serde(default = "default_max_slippage_bps")]
	pub max_slippage_bps: u32,
	/// Seconds from submission until the router rejects the swap.
	#[serde(default = "default_deadline_seconds")]
	pub deadline_seconds: u64,
}

impl Default for ExecutionConfig {
	fn default() -> Self {
		Self {
			gas_limit: default_gas_limit(),
			confirmation_poll_interval_ms: default_confirmation_poll_interval_ms(),
			default_slippage_bps: default_slippage_bps(),
			max_slippage_bps: default_max_slippage_bps(),
			deadline_seconds: default_deadline_seconds(),
		}
	}
}

impl ExecutionConfig {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.confirmation_poll_interval_ms)
	}
}

/// Local signing credential.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex private key. Usually supplied as `${SWAP_PRIVATE_KEY}`.
	pub private_key: SecretKey,
}

/// Returns the default token scale of 18 decimals.
fn default_decimals() -> u8 {
	18
}

/// Returns the default fee tier for the intermediate to stable leg.
///
/// Wrapped-native/stable pairs are deepest in the 0.05% pool.
fn default_intermediate_stable_fee_tier() -> FeeTier {
	FeeTier::Low
}

fn default_local_currency() -> String {
	"USD".to_string()
}

fn default_local_currency_rate() -> String {
	"1".to_string()
}

/// Returns the default gas limit of 3,000,000.
fn default_gas_limit() -> u64 {
	swap_types::delivery::DEFAULT_GAS_LIMIT
}

/// Returns the default receipt polling interval of 2 seconds.
fn default_confirmation_poll_interval_ms() -> u64 {
	2_000
}

/// Returns the default slippage of 0.5%.
fn default_slippage_bps() -> u32 {
	50
}

/// Returns the default slippage ceiling of 5%.
fn default_max_slippage_bps() -> u32 {
	500
}

/// Returns the default swap deadline of 20 minutes.
fn default_deadline_seconds() -> u64 {
	1_200
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all values are usable.
	///
	/// Checks the RPC endpoint, contract and token addresses, slippage
	/// bounds, the local currency rate and the shape of the private key.
	fn validate(&self) -> Result<(), ConfigError> {
		let rpc_url = self.network.rpc_url.trim();
		if rpc_url.is_empty() {
			return Err(ConfigError::Validation("rpc_url cannot be empty".into()));
		}
		if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"rpc_url must be an http(s) endpoint, got '{}'",
				rpc_url
			)));
		}

		if self.dex.quoter == Address::ZERO {
			return Err(ConfigError::Validation(
				"dex.quoter cannot be the zero address".into(),
			));
		}
		if self.dex.router == Some(Address::ZERO) {
			return Err(ConfigError::Validation(
				"dex.router cannot be the zero address".into(),
			));
		}
		for token in [&self.dex.wrapped_native, &self.dex.stable] {
			if token.address == Address::ZERO {
				return Err(ConfigError::Validation(format!(
					"Token {} cannot use the zero address",
					token.symbol
				)));
			}
			// 10^77 is the largest power of ten below 2^256
			if token.decimals > 77 {
				return Err(ConfigError::Validation(format!(
					"Token {} has {} decimals (max 77)",
					token.symbol, token.decimals
				)));
			}
		}
		if self.dex.wrapped_native.address == self.dex.stable.address {
			return Err(ConfigError::Validation(
				"dex.wrapped_native and dex.stable must be different tokens".into(),
			));
		}
		if let Some(sale_token) = self.dex.sale_token {
			if sale_token == self.dex.wrapped_native.address
				|| sale_token == self.dex.stable.address
			{
				return Err(ConfigError::Validation(
					"dex.sale_token cannot be the wrapped native or stable token".into(),
				));
			}
		}

		let rate = self.pricing.rate()?;
		if rate <= BigDecimal::zero() {
			return Err(ConfigError::Validation(
				"local_currency_rate must be greater than 0".into(),
			));
		}

		let execution = &self.execution;
		if execution.gas_limit == 0 {
			return Err(ConfigError::Validation(
				"gas_limit must be greater than 0".into(),
			));
		}
		if execution.confirmation_poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"confirmation_poll_interval_ms must be greater than 0".into(),
			));
		}
		if execution.max_slippage_bps >= 10_000 {
			return Err(ConfigError::Validation(
				"max_slippage_bps must be below 10000".into(),
			));
		}
		if execution.default_slippage_bps > execution.max_slippage_bps {
			return Err(ConfigError::Validation(format!(
				"default_slippage_bps ({}) exceeds max_slippage_bps ({})",
				execution.default_slippage_bps, execution.max_slippage_bps
			)));
		}
		if execution.deadline_seconds == 0 {
			return Err(ConfigError::Validation(
				"deadline_seconds must be greater than 0".into(),
			));
		}

		if let Some(account) = &self.account {
			if !account.private_key.is_well_formed() {
				return Err(ConfigError::Validation(
					"account.private_key must be 32 bytes of hex".into(),
				));
			}
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
