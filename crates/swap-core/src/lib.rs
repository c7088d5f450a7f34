//! Core swap engine.
//!
//! Ties the quote resolver, the transaction builder, the router executor and
//! the confirmation poller together behind [`SwapEngine`], the surface the
//! HTTP layer talks to. Every error it returns carries an [`ErrorCategory`]
//! so callers can pick a status code without inspecting messages.

use swap_account::AccountError;
use swap_config::ConfigError;
use swap_delivery::TransportError;
use swap_price::QuoteError;
use swap_types::TransactionHash;
use thiserror::Error;

pub mod engine;
pub mod executor;
pub mod monitoring;
pub mod transactor;

pub use engine::{SwapEngine, TokenPrice};
pub use executor::{min_amount_out_with_slippage, SwapExecutor, BPS_DENOMINATOR};
pub use monitoring::{ConfirmationPoller, Sleeper, TokioSleeper};
pub use transactor::TransactorBuilder;

/// Errors raised while building, submitting or confirming a swap.
#[derive(Debug, Error)]
pub enum ExecutionError {
	#[error("router not initialized")]
	RouterUninitialized,
	#[error("credential not initialized")]
	CredentialMissing,
	#[error("failed to get chain id: {0}")]
	ChainId(TransportError),
	#[error("failed to get nonce: {0}")]
	Nonce(TransportError),
	#[error("failed to get gas price: {0}")]
	GasPrice(TransportError),
	#[error("failed to sign transaction: {0}")]
	Signing(#[from] AccountError),
	#[error("invalid swap path: {0}")]
	InvalidPath(String),
	#[error("slippage of {bps} bps exceeds the maximum of {max} bps")]
	Slippage { bps: u32, max: u32 },
	/// Broadcast was refused by the node.
	#[error("swap failed: {0}")]
	SwapFailed(TransportError),
	/// Mined with a failure status.
	#[error("swap transaction reverted: {0}")]
	Reverted(TransactionHash),
	#[error("confirmation cancelled")]
	Cancelled,
}

/// Coarse error classes for the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
	/// The caller sent something unusable.
	BadRequest,
	/// No pool could price or route the request.
	NoLiquidity,
	/// The chain rejected the swap.
	Reverted,
	/// The node failed or answered with garbage.
	Gateway,
	/// A required component is not configured.
	Unavailable,
	/// The caller gave up waiting.
	Cancelled,
	Internal,
}

impl ErrorCategory {
	pub fn http_status(self) -> u16 {
		match self {
			ErrorCategory::BadRequest => 400,
			ErrorCategory::Reverted => 422,
			ErrorCategory::Internal => 500,
			ErrorCategory::Gateway => 502,
			ErrorCategory::NoLiquidity | ErrorCategory::Unavailable => 503,
			ErrorCategory::Cancelled => 504,
		}
	}
}

/// Errors returned by [`SwapEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Transport(#[from] TransportError),
	#[error(transparent)]
	Account(#[from] AccountError),
	#[error(transparent)]
	Quote(#[from] QuoteError),
	#[error(transparent)]
	Execution(#[from] ExecutionError),
	/// An exact value has no floating point representation.
	#[error("Cannot present value as a float: {0}")]
	Presentation(String),
}

impl EngineError {
	pub fn category(&self) -> ErrorCategory {
		match self {
			EngineError::InvalidAddress(_) => ErrorCategory::BadRequest,
			EngineError::Config(_) | EngineError::Account(_) | EngineError::Presentation(_) => {
				ErrorCategory::Internal
			},
			EngineError::Transport(e) => transport_category(e),
			EngineError::Quote(e) => quote_category(e),
			EngineError::Execution(e) => execution_category(e),
		}
	}

	pub fn http_status(&self) -> u16 {
		self.category().http_status()
	}
}

fn transport_category(error: &TransportError) -> ErrorCategory {
	match error {
		TransportError::ExecutionReverted(_) => ErrorCategory::Reverted,
		TransportError::Network(_) | TransportError::InvalidResponse(_) => ErrorCategory::Gateway,
		TransportError::Configuration(_) => ErrorCategory::Internal,
	}
}

fn quote_category(error: &QuoteError) -> ErrorCategory {
	if error.is_no_liquidity() {
		return ErrorCategory::NoLiquidity;
	}
	match error {
		QuoteError::IntermediatePrice(inner) => quote_category(inner),
		QuoteError::Transport(e) => transport_category(e),
		QuoteError::Encoding(_) => ErrorCategory::Gateway,
		_ => ErrorCategory::Internal,
	}
}

fn execution_category(error: &ExecutionError) -> ErrorCategory {
	match error {
		ExecutionError::RouterUninitialized | ExecutionError::CredentialMissing => {
			ErrorCategory::Unavailable
		},
		ExecutionError::ChainId(_) | ExecutionError::Nonce(_) | ExecutionError::GasPrice(_) => {
			ErrorCategory::Gateway
		},
		ExecutionError::InvalidPath(_) | ExecutionError::Slippage { .. } => ErrorCategory::BadRequest,
		ExecutionError::SwapFailed(e) => match transport_category(e) {
			ErrorCategory::Reverted => ErrorCategory::Reverted,
			_ => ErrorCategory::Gateway,
		},
		ExecutionError::Reverted(_) => ErrorCategory::Reverted,
		ExecutionError::Cancelled => ErrorCategory::Cancelled,
		ExecutionError::Signing(_) => ErrorCategory::Internal,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{Address, B256};
	use swap_types::AbiError;

	#[test]
	fn test_http_mapping() {
		let no_liquidity = EngineError::from(QuoteError::NoLiquidityOnAnyFeeTier {
			token_in: Address::ZERO,
			token_out: Address::repeat_byte(1),
		});
		assert_eq!(no_liquidity.category(), ErrorCategory::NoLiquidity);
		assert_eq!(no_liquidity.http_status(), 503);

		let reverted = EngineError::from(ExecutionError::Reverted(TransactionHash(B256::ZERO)));
		assert_eq!(reverted.http_status(), 422);

		let gateway = EngineError::from(ExecutionError::Nonce(TransportError::Network(
			"timeout".into(),
		)));
		assert_eq!(gateway.http_status(), 502);

		assert_eq!(EngineError::InvalidAddress("0x12".into()).http_status(), 400);
		assert_eq!(EngineError::from(ExecutionError::Cancelled).http_status(), 504);
		assert_eq!(
			EngineError::from(ExecutionError::RouterUninitialized).category(),
			ErrorCategory::Unavailable
		);
	}

	#[test]
	fn test_nested_quote_errors_keep_their_class() {
		let wrapped = QuoteError::IntermediatePrice(Box::new(QuoteError::Transport(
			TransportError::Network("connection reset".into()),
		)));
		assert_eq!(EngineError::from(wrapped).category(), ErrorCategory::Gateway);

		let reverted_leg = QuoteError::IntermediatePrice(Box::new(QuoteError::Transport(
			TransportError::ExecutionReverted("execution reverted".into()),
		)));
		assert_eq!(
			EngineError::from(reverted_leg).category(),
			ErrorCategory::NoLiquidity
		);

		let garbage = QuoteError::Encoding(AbiError::EmptyInput);
		assert_eq!(EngineError::from(garbage).http_status(), 502);
	}

	#[test]
	fn test_refused_broadcast_classes() {
		let refused = ExecutionError::SwapFailed(TransportError::ExecutionReverted(
			"execution reverted: INSUFFICIENT_OUTPUT_AMOUNT".into(),
		));
		assert_eq!(EngineError::from(refused).category(), ErrorCategory::Reverted);

		let down = ExecutionError::SwapFailed(TransportError::Network("503".into()));
		assert_eq!(EngineError::from(down).category(), ErrorCategory::Gateway);
	}
}
