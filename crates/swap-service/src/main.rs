//! Main entry point for the Aristoswap service.
//!
//! This binary wires the swap engine to an in-memory asset ledger and
//! serves the query and mutating surfaces over HTTP for development
//! relayers and the off-chain signing tooling.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use swap_config::Config;
use swap_core::SwapEngine;
use swap_ledger::implementations::memory::MemoryAssetLedger;

mod server;

/// Command-line arguments for the swap service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the swap service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads and validates configuration from file
/// 4. Builds the swap engine over an in-memory ledger
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.to_string()));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.init();

	let config = Config::from_file(&args.config)?;
	tracing::info!(
		"Loaded configuration [{} v{} on chain {}]",
		config.domain.name,
		config.domain.version,
		config.domain.chain_id
	);

	let ledger = Arc::new(MemoryAssetLedger::new(config.payment.token));
	let engine = Arc::new(SwapEngine::new(&config, ledger.clone()));

	if !config.api.enabled {
		tracing::warn!("API server disabled in configuration; nothing to serve");
		return Ok(());
	}

	server::start_server(config.api.clone(), engine, ledger).await?;

	tracing::info!("Stopped service");
	Ok(())
}
