//! `swapctl`: operator command line for the swap engine.
//!
//! Loads the configuration, connects to the node and runs one command,
//! printing its result as JSON.

use clap::Parser;
use std::path::PathBuf;
use swap_config::Config;
use swap_core::SwapEngine;

mod commands;

use commands::Command;

/// Command-line arguments for swapctl.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", global = true)]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info", global = true)]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let path = args.config.to_string_lossy();
	let config = Config::from_file(&path).await?;
	tracing::info!(config = %path, rpc_url = %config.network.rpc_url, "Loaded configuration");

	let engine = SwapEngine::from_config(config).await?;

	match commands::run(&engine, args.command).await {
		Ok(output) => {
			println!("{}", serde_json::to_string_pretty(&output)?);
			Ok(())
		},
		Err(e) => {
			tracing::error!(
				category = ?e.category(),
				http_status = e.http_status(),
				error = %e,
				"Command failed"
			);
			Err(e.into())
		},
	}
}
