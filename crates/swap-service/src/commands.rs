//! Subcommands of `swapctl`.

use alloy_primitives::U256;
use clap::Subcommand;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;
use swap_core::{EngineError, SwapEngine, TokenPrice};
use tokio_util::sync::CancellationToken;

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Price 10^18 base units of a token in the stable asset and the local currency
	Price {
		/// Token address
		token: String,
	},
	/// Buy a token with native coin, bounded by a fresh quote less slippage
	Buy {
		/// Token address
		token: String,
		/// Native coin to spend, in wei
		#[arg(long, value_parser = parse_amount)]
		amount: U256,
		/// Accepted slippage in basis points
		#[arg(long)]
		slippage_bps: Option<u32>,
		/// Receiver of the tokens; defaults to the signing account
		#[arg(long)]
		recipient: Option<String>,
		/// Stop waiting for the receipt after this many seconds
		#[arg(long)]
		timeout_secs: Option<u64>,
	},
	/// Swap native coin along an explicit path
	Swap {
		/// Native coin to spend, in wei
		#[arg(long, value_parser = parse_amount)]
		amount: U256,
		/// Minimum output in the last token's base units
		#[arg(long, value_parser = parse_amount, default_value = "0")]
		min_out: U256,
		/// Comma separated token addresses, starting at the wrapped native token
		#[arg(long, value_delimiter = ',', required = true)]
		path: Vec<String>,
		#[arg(long)]
		recipient: String,
		/// Unix timestamp after which the router rejects the swap
		#[arg(long)]
		deadline: u64,
		/// Stop waiting for the receipt after this many seconds
		#[arg(long)]
		timeout_secs: Option<u64>,
	},
}

/// Parses a base-unit amount, decimal or `0x` hex.
pub fn parse_amount(text: &str) -> Result<U256, String> {
	U256::from_str(text.trim()).map_err(|e| format!("invalid amount '{}': {}", text, e))
}

pub async fn run(engine: &SwapEngine, command: Command) -> Result<Value, EngineError> {
	match command {
		Command::Price { token } => {
			let price = engine.get_price(&token).await?;
			Ok(price_json(&price))
		},
		Command::Buy {
			token,
			amount,
			slippage_bps,
			recipient,
			timeout_secs,
		} => {
			let cancel = cancel_on_interrupt(timeout_secs);
			let tx_hash = engine
				.buy_with_native(&token, amount, slippage_bps, recipient.as_deref(), &cancel)
				.await?;
			Ok(json!({ "tx_hash": tx_hash }))
		},
		Command::Swap {
			amount,
			min_out,
			path,
			recipient,
			deadline,
			timeout_secs,
		} => {
			let cancel = cancel_on_interrupt(timeout_secs);
			let path: Vec<&str> = path.iter().map(String::as_str).collect();
			let tx_hash = engine
				.swap_exact_native_for_token(amount, min_out, &path, &recipient, deadline, &cancel)
				.await?;
			Ok(json!({ "tx_hash": tx_hash }))
		},
	}
}

pub fn price_json(price: &TokenPrice) -> Value {
	let route = price.route.as_ref().map(|route| {
		route
			.legs()
			.iter()
			.map(|leg| {
				json!({
					"token_in": leg.token_in.to_string(),
					"token_out": leg.token_out.to_string(),
					"fee_tier": u32::from(leg.fee_tier),
				})
			})
			.collect::<Vec<_>>()
	});

	json!({
		"token": price.token.to_string(),
		"price": price.price.to_string(),
		"usd": price.usd,
		"local": price.local,
		"local_currency": price.local_currency,
		"route": route,
	})
}

/// Token cancelled on Ctrl+C or once `timeout_secs` have passed.
fn cancel_on_interrupt(timeout_secs: Option<u64>) -> CancellationToken {
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();
	tokio::spawn(async move {
		let timeout = async {
			match timeout_secs {
				Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
				None => std::future::pending().await,
			}
		};
		tokio::select! {
			_ = tokio::signal::ctrl_c() => tracing::warn!("Interrupted, no longer waiting for the receipt"),
			_ = timeout => tracing::warn!("Timed out waiting for the receipt"),
			_ = trigger.cancelled() => return,
		}
		trigger.cancel();
	});
	cancel
}
