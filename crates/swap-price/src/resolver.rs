//! Fee-tier quote resolution.
//!
//! Two selection policies live here. The sale token takes the best quote
//! across all tiers; every other token takes the first tier that answers.

use crate::{PriceQuote, QuoteError};
use alloy_primitives::{Address, Bytes, U256};
use bigdecimal::{BigDecimal, One};
use std::sync::Arc;
use swap_config::{DexConfig, TokenConfig};
use swap_delivery::RpcTransport;
use swap_types::{
	decode_amount_bytes, encode_quote_call, scale_down, FeeTier, Quote, RouteLeg, RoutePlan,
	FEE_TIER_ORDER,
};

/// Input used for every price quote: 10^18 base units of the input token.
///
/// This is one whole token only when the input token has 18 decimals.
pub const PRICE_QUOTE_AMOUNT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Resolves quotes and prices against the exchange's quoter contract.
pub struct QuoteResolver {
	transport: Arc<dyn RpcTransport>,
	quoter: Address,
	intermediate: TokenConfig,
	stable: TokenConfig,
	sale_token: Option<Address>,
	intermediate_stable_fee_tier: FeeTier,
}

impl QuoteResolver {
	pub fn new(transport: Arc<dyn RpcTransport>, dex: &DexConfig) -> Self {
		Self {
			transport,
			quoter: dex.quoter,
			intermediate: dex.wrapped_native.clone(),
			stable: dex.stable.clone(),
			sale_token: dex.sale_token,
			intermediate_stable_fee_tier: dex.intermediate_stable_fee_tier,
		}
	}

	/// Quotes one pool. No retry: any failure is returned as is.
	pub async fn quote_single_hop(
		&self,
		token_in: Address,
		token_out: Address,
		fee_tier: FeeTier,
		amount_in: U256,
	) -> Result<U256, QuoteError> {
		let data = encode_quote_call(&token_in, &token_out, fee_tier, amount_in);
		let result = self.transport.call(self.quoter, Bytes::from(data)).await?;
		Ok(decode_amount_bytes(&result)?)
	}

	/// Quotes one pool, moving down the fallback chain while pools revert.
	///
	/// Starts at `fee_tier` and follows [`swap_types::FEE_TIER_FALLBACK`].
	/// Only an `execution reverted` failure moves to the next tier; anything
	/// else is returned immediately.
	pub async fn quote_single_hop_with_retry(
		&self,
		token_in: Address,
		token_out: Address,
		fee_tier: FeeTier,
		amount_in: U256,
	) -> Result<Quote, QuoteError> {
		let mut last_error = None;

		for &tier in fee_tier.fallback_from() {
			match self
				.quote_single_hop(token_in, token_out, tier, amount_in)
				.await
			{
				Ok(amount_out) => {
					return Ok(Quote {
						amount_out,
						fee_tier: tier,
					})
				},
				Err(QuoteError::Transport(e)) if e.is_execution_reverted() => {
					tracing::debug!(%token_in, %token_out, fee_tier = %tier, "Pool reverted, trying next tier");
					last_error = Some(e);
				},
				Err(e) => return Err(e),
			}
		}

		Err(QuoteError::NoLiquidityForPair {
			token_in,
			token_out,
			last_error,
		})
	}

	/// Queries every tier and keeps the strictly greatest output.
	///
	/// Failing tiers are skipped. On a tie the earlier tier in
	/// [`FEE_TIER_ORDER`] wins.
	pub async fn best_of_all_tiers(
		&self,
		token_in: Address,
		token_out: Address,
		amount_in: U256,
	) -> Result<Quote, QuoteError> {
		let mut best: Option<Quote> = None;

		for tier in FEE_TIER_ORDER {
			match self
				.quote_single_hop(token_in, token_out, tier, amount_in)
				.await
			{
				Ok(amount_out) => {
					tracing::debug!(%token_in, %token_out, fee_tier = %tier, %amount_out, "Tier quoted");
					if best.is_none_or(|b| amount_out > b.amount_out) {
						best = Some(Quote {
							amount_out,
							fee_tier: tier,
						});
					}
				},
				Err(e) => {
					tracing::debug!(%token_in, %token_out, fee_tier = %tier, error = %e, "Tier unusable");
				},
			}
		}

		best.ok_or(QuoteError::NoLiquidityOnAnyFeeTier {
			token_in,
			token_out,
		})
	}

	/// Quotes an arbitrary amount through the first tier that answers.
	pub async fn expected_output(
		&self,
		token_in: Address,
		token_out: Address,
		amount_in: U256,
	) -> Result<Quote, QuoteError> {
		self.first_success(token_in, token_out, amount_in)
			.await
			.ok_or(QuoteError::NoLiquidityOnAnyFeeTier {
				token_in,
				token_out,
			})
	}

	/// Stable-asset output for [`PRICE_QUOTE_AMOUNT`] base units of `token`.
	pub async fn get_price(&self, token: Address) -> Result<PriceQuote, QuoteError> {
		if token == self.stable.address {
			return Ok(PriceQuote {
				token,
				price: BigDecimal::one(),
				route: None,
			});
		}

		if self.sale_token == Some(token) {
			self.sale_token_price(token).await
		} else {
			self.first_success_price(token).await
		}
	}

	/// Best-of-all-tiers against the intermediate asset, then the fixed
	/// intermediate to stable leg.
	async fn sale_token_price(&self, token: Address) -> Result<PriceQuote, QuoteError> {
		let first = self
			.best_of_all_tiers(token, self.intermediate.address, PRICE_QUOTE_AMOUNT)
			.await?;
		let first_price = scale_down(first.amount_out, self.intermediate.decimals);

		let (second_price, second_leg) = self
			.intermediate_stable_price()
			.await
			.map_err(|e| QuoteError::IntermediatePrice(Box::new(e)))?;

		Ok(PriceQuote {
			token,
			price: first_price * second_price,
			route: Some(RoutePlan::two_hop(
				RouteLeg::new(token, self.intermediate.address, first.fee_tier),
				second_leg,
			)?),
		})
	}

	/// Direct stable quote on the first tier that answers, falling back to a
	/// route through the intermediate asset.
	async fn first_success_price(&self, token: Address) -> Result<PriceQuote, QuoteError> {
		let stable = self.stable.address;
		if let Some(direct) = self.first_success(token, stable, PRICE_QUOTE_AMOUNT).await {
			return Ok(PriceQuote {
				token,
				price: scale_down(direct.amount_out, self.stable.decimals),
				route: Some(RoutePlan::direct(RouteLeg::new(
					token,
					stable,
					direct.fee_tier,
				))),
			});
		}

		tracing::debug!(%token, "No direct stable pool, routing through intermediate asset");

		let intermediate = self.intermediate.address;
		let first = self
			.first_success(token, intermediate, PRICE_QUOTE_AMOUNT)
			.await
			.ok_or(QuoteError::NoIntermediateLiquidity { token })?;
		let first_price = scale_down(first.amount_out, self.intermediate.decimals);

		let (second_price, second_leg) = self
			.intermediate_stable_price()
			.await
			.map_err(|e| QuoteError::IntermediatePrice(Box::new(e)))?;

		Ok(PriceQuote {
			token,
			price: first_price * second_price,
			route: Some(RoutePlan::two_hop(
				RouteLeg::new(token, intermediate, first.fee_tier),
				second_leg,
			)?),
		})
	}

	/// Tries tiers in [`FEE_TIER_ORDER`] and stops at the first answer.
	async fn first_success(
		&self,
		token_in: Address,
		token_out: Address,
		amount_in: U256,
	) -> Option<Quote> {
		for tier in FEE_TIER_ORDER {
			match self
				.quote_single_hop(token_in, token_out, tier, amount_in)
				.await
			{
				Ok(amount_out) => {
					tracing::debug!(%token_in, %token_out, fee_tier = %tier, %amount_out, "Tier quoted");
					return Some(Quote {
						amount_out,
						fee_tier: tier,
					});
				},
				Err(e) => {
					tracing::debug!(%token_in, %token_out, fee_tier = %tier, error = %e, "Tier unusable");
				},
			}
		}
		None
	}

	async fn intermediate_stable_price(&self) -> Result<(BigDecimal, RouteLeg), QuoteError> {
		let leg = RouteLeg::new(
			self.intermediate.address,
			self.stable.address,
			self.intermediate_stable_fee_tier,
		);
		let amount_out = self
			.quote_single_hop(leg.token_in, leg.token_out, leg.fee_tier, PRICE_QUOTE_AMOUNT)
			.await?;
		Ok((scale_down(amount_out, self.stable.decimals), leg))
	}
}
