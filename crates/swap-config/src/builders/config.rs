//! Configuration builder for tests and local tooling.
//!
//! Produces a valid [`Config`] pointing at a local node with well-known
//! placeholder addresses, so tests only override what they care about.

use crate::{
	AccountConfig, Config, DexConfig, ExecutionConfig, NetworkConfig, PricingConfig, TokenConfig,
};
use alloy_primitives::Address;
use swap_types::{FeeTier, SecretKey};

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	router: Option<Address>,
	wrapped_native: TokenConfig,
	stable: TokenConfig,
	sale_token: Option<Address>,
	intermediate_stable_fee_tier: FeeTier,
	local_currency_rate: String,
	execution: ExecutionConfig,
	private_key: Option<String>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		Self {
			router: Some(Address::repeat_byte(0x02)),
			wrapped_native: TokenConfig {
				address: Address::repeat_byte(0x0e),
				symbol: "WETH".to_string(),
				decimals: 18,
			},
			stable: TokenConfig {
				address: Address::repeat_byte(0x05),
				symbol: "USDT".to_string(),
				decimals: 18,
			},
			sale_token: None,
			intermediate_stable_fee_tier: FeeTier::Low,
			local_currency_rate: "1".to_string(),
			execution: ExecutionConfig::default(),
			private_key: None,
		}
	}

	/// Sets or clears the swap router.
	pub fn router(mut self, router: Option<Address>) -> Self {
		self.router = router;
		self
	}

	pub fn wrapped_native(mut self, address: Address, decimals: u8) -> Self {
		self.wrapped_native.address = address;
		self.wrapped_native.decimals = decimals;
		self
	}

	pub fn stable(mut self, address: Address, decimals: u8) -> Self {
		self.stable.address = address;
		self.stable.decimals = decimals;
		self
	}

	pub fn sale_token(mut self, token: Address) -> Self {
		self.sale_token = Some(token);
		self
	}

	pub fn intermediate_stable_fee_tier(mut self, tier: FeeTier) -> Self {
		self.intermediate_stable_fee_tier = tier;
		self
	}

	pub fn local_currency_rate(mut self, rate: impl Into<String>) -> Self {
		self.local_currency_rate = rate.into();
		self
	}

	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.execution.gas_limit = gas_limit;
		self
	}

	pub fn private_key(mut self, key: impl Into<String>) -> Self {
		self.private_key = Some(key.into());
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			network: NetworkConfig {
				rpc_url: "http://localhost:8545".to_string(),
				chain_id: None,
			},
			dex: DexConfig {
				quoter: Address::repeat_byte(0x01),
				router: self.router,
				wrapped_native: self.wrapped_native,
				stable: self.stable,
				sale_token: self.sale_token,
				intermediate_stable_fee_tier: self.intermediate_stable_fee_tier,
			},
			pricing: PricingConfig {
				local_currency: "NGN".to_string(),
				local_currency_rate: self.local_currency_rate,
			},
			execution: self.execution,
			account: self.private_key.map(|key| AccountConfig {
				private_key: SecretKey::new(key),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_built_config_passes_validation() {
		let config = ConfigBuilder::new()
			.sale_token(Address::repeat_byte(0x5a))
			.private_key("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
			.build();
		assert!(config.validate().is_ok());
		assert!(config.account.is_some());
	}

	#[test]
	fn test_gas_limit_override() {
		let config = ConfigBuilder::new().gas_limit(250_000).build();
		assert_eq!(config.execution.gas_limit, 250_000);
		assert!(config.account.is_none());
	}
}
