//! Receipt polling for submitted swaps.
//!
//! Polls the node at a fixed interval until the transaction is mined. There
//! is no attempt limit; callers bound the wait by cancelling the token.

use crate::ExecutionError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use swap_delivery::RpcTransport;
use swap_types::{truncate_id, TransactionHash, TransactionReceipt};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Waits between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
	async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
	async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await;
	}
}

pub struct ConfirmationPoller {
	transport: Arc<dyn RpcTransport>,
	sleeper: Arc<dyn Sleeper>,
	interval: Duration,
}

impl ConfirmationPoller {
	pub fn new(transport: Arc<dyn RpcTransport>, interval: Duration) -> Self {
		Self {
			transport,
			sleeper: Arc::new(TokioSleeper),
			interval,
		}
	}

	pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
		self.sleeper = sleeper;
		self
	}

	/// Polls until a receipt for `hash` exists.
	///
	/// Cancellation is checked before every lookup and while sleeping. A
	/// failed lookup counts as "not mined yet".
	#[instrument(skip_all, fields(tx_hash = %truncate_id(&hash.to_hex())))]
	pub async fn await_receipt(
		&self,
		hash: &TransactionHash,
		cancel: &CancellationToken,
	) -> Result<TransactionReceipt, ExecutionError> {
		let mut polls: u64 = 0;

		loop {
			if cancel.is_cancelled() {
				tracing::info!(polls, "Confirmation cancelled");
				return Err(ExecutionError::Cancelled);
			}

			polls += 1;
			match self.transport.get_receipt(hash).await {
				Ok(Some(receipt)) => {
					tracing::info!(
						block_number = receipt.block_number,
						success = receipt.success,
						polls,
						"Transaction mined"
					);
					return Ok(receipt);
				},
				Ok(None) => {
					tracing::debug!(polls, "Waiting for transaction to be mined");
				},
				Err(e) => {
					tracing::warn!(polls, error = %e, "Receipt lookup failed, retrying");
				},
			}

			tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					tracing::info!(polls, "Confirmation cancelled");
					return Err(ExecutionError::Cancelled);
				}
				_ = self.sleeper.sleep(self.interval) => {}
			}
		}
	}
}
