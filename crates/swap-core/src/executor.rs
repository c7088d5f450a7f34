//! Router swap execution.
//!
//! Encodes `swapExactETHForTokens` against the configured router, signs it
//! with a fresh signing context, broadcasts it and waits for the receipt.

use crate::monitoring::ConfirmationPoller;
use crate::transactor::TransactorBuilder;
use crate::ExecutionError;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use std::sync::Arc;
use swap_delivery::RpcTransport;
use swap_types::{truncate_id, TransactionHash};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

sol! {
	/// Router entry points used for swaps.
	interface IUniswapV2Router02 {
		function swapExactETHForTokens(
			uint256 amountOutMin,
			address[] calldata path,
			address to,
			uint256 deadline
		) external payable returns (uint256[] memory amounts);
	}
}

/// Basis points in one whole.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Lowest acceptable output for `expected` after `slippage_bps`.
///
/// Rounds down and cannot overflow for any `expected`. Slippage above
/// `max_slippage_bps` (or a whole 100%) is rejected.
pub fn min_amount_out_with_slippage(
	expected: U256,
	slippage_bps: u32,
	max_slippage_bps: u32,
) -> Result<U256, ExecutionError> {
	if slippage_bps > max_slippage_bps || slippage_bps >= BPS_DENOMINATOR {
		return Err(ExecutionError::Slippage {
			bps: slippage_bps,
			max: max_slippage_bps.min(BPS_DENOMINATOR - 1),
		});
	}

	// floor(expected * keep / D) split as q * keep + floor(r * keep / D)
	let denominator = U256::from(BPS_DENOMINATOR);
	let keep = U256::from(BPS_DENOMINATOR - slippage_bps);
	let quotient = expected / denominator;
	let remainder = expected % denominator;
	Ok(quotient * keep + remainder * keep / denominator)
}

pub struct SwapExecutor {
	transactor: TransactorBuilder,
	transport: Arc<dyn RpcTransport>,
	poller: ConfirmationPoller,
	router: Option<Address>,
	wrapped_native: Address,
}

impl SwapExecutor {
	pub fn new(
		transactor: TransactorBuilder,
		transport: Arc<dyn RpcTransport>,
		poller: ConfirmationPoller,
		router: Option<Address>,
		wrapped_native: Address,
	) -> Self {
		Self {
			transactor,
			transport,
			poller,
			router,
			wrapped_native,
		}
	}

	/// Swaps `amount_in` of the native coin along `path` and waits for it to
	/// be mined.
	///
	/// Returns the hash once the receipt reports success. A mined failure is
	/// [`ExecutionError::Reverted`]; poller errors, cancellation included,
	/// are returned as they are.
	#[instrument(skip_all, fields(amount_in = %amount_in, hops = path.len().saturating_sub(1)))]
	pub async fn swap_exact_native_for_token(
		&self,
		amount_in: U256,
		min_amount_out: U256,
		path: &[Address],
		recipient: Address,
		deadline: u64,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, ExecutionError> {
		let router = self.router.ok_or(ExecutionError::RouterUninitialized)?;
		self.validate_path(path)?;

		let context = self
			.transactor
			.build_signing_context()
			.await?
			.with_value(amount_in);

		let call = IUniswapV2Router02::swapExactETHForTokensCall {
			amountOutMin: min_amount_out,
			path: path.to_vec(),
			to: recipient,
			deadline: U256::from(deadline),
		};
		let envelope = self
			.transactor
			.sign(&context, router, Bytes::from(call.abi_encode()))
			.await?;

		let hash = self
			.transport
			.send_transaction(envelope)
			.await
			.map_err(ExecutionError::SwapFailed)?;
		tracing::info!(
			tx_hash = %truncate_id(&hash.to_hex()),
			nonce = context.nonce,
			%min_amount_out,
			"Swap submitted"
		);

		let receipt = self.poller.await_receipt(&hash, cancel).await?;
		if !receipt.success {
			tracing::warn!(tx_hash = %truncate_id(&hash.to_hex()), "Swap reverted");
			return Err(ExecutionError::Reverted(hash));
		}

		Ok(hash)
	}

	fn validate_path(&self, path: &[Address]) -> Result<(), ExecutionError> {
		if path.len() < 2 {
			return Err(ExecutionError::InvalidPath(format!(
				"expected at least two tokens, got {}",
				path.len()
			)));
		}
		if path[0] != self.wrapped_native {
			return Err(ExecutionError::InvalidPath(format!(
				"path must start at the wrapped native token {}, starts at {}",
				self.wrapped_native, path[0]
			)));
		}
		if path.iter().any(|token| token.is_zero()) {
			return Err(ExecutionError::InvalidPath(
				"path contains the zero address".to_string(),
			));
		}
		Ok(())
	}
}
