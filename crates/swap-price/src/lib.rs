//! Price discovery module for the swap engine.
//!
//! Prices are derived from on-chain quotes against fee-tiered pools. The
//! [`QuoteResolver`] queries pools in a fixed order and composes one- or
//! two-hop routes into an exact decimal price in the stable asset.

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use swap_delivery::TransportError;
use swap_types::{AbiError, RouteError, RoutePlan};
use thiserror::Error;

mod resolver;

pub use resolver::{QuoteResolver, PRICE_QUOTE_AMOUNT};

/// Errors that can occur while resolving quotes and prices.
#[derive(Debug, Error)]
pub enum QuoteError {
	/// Call data could not be built or return data could not be read.
	#[error(transparent)]
	Encoding(#[from] AbiError),
	/// The quote call itself failed.
	#[error("Transport error: {0}")]
	Transport(#[from] TransportError),
	/// Every tier was queried and none returned a usable quote.
	#[error("no liquidity on any fee tier for {token_in} -> {token_out}")]
	NoLiquidityOnAnyFeeTier { token_in: Address, token_out: Address },
	/// The retrying quote walked the whole fallback chain.
	#[error("no liquidity found for pair on any fee tier ({token_in} -> {token_out})")]
	NoLiquidityForPair {
		token_in: Address,
		token_out: Address,
		/// Revert reported by the last tier tried.
		last_error: Option<TransportError>,
	},
	/// The first leg of the two-hop fallback found no pool.
	#[error("cannot find liquidity to intermediate asset on any fee tier for {token}")]
	NoIntermediateLiquidity { token: Address },
	/// Legs could not be assembled into a route.
	#[error("Route error: {0}")]
	Route(#[from] RouteError),
	/// The intermediate to stable leg failed.
	#[error("failed to get intermediate/stable price: {0}")]
	IntermediatePrice(#[source] Box<QuoteError>),
}

impl QuoteError {
	/// True for the errors that mean "no pool could price this".
	pub fn is_no_liquidity(&self) -> bool {
		match self {
			QuoteError::NoLiquidityOnAnyFeeTier { .. }
			| QuoteError::NoLiquidityForPair { .. }
			| QuoteError::NoIntermediateLiquidity { .. } => true,
			QuoteError::IntermediatePrice(inner) => inner.is_no_liquidity(),
			QuoteError::Transport(e) => e.is_execution_reverted(),
			QuoteError::Encoding(_) | QuoteError::Route(_) => false,
		}
	}
}

/// Stable-asset value of 10^18 base units of a token.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
	pub token: Address,
	/// Exact decimal price. Never rounded inside the resolver.
	pub price: BigDecimal,
	/// Pools the price was read from; `None` for the stable asset itself.
	pub route: Option<RoutePlan>,
}
