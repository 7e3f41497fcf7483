//! Entry point for the quiz leaderboard service.

use anyhow::Context;
use quiz_leaderboard::Config;

mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	if let Err(error) = dotenvy::dotenv() {
		eprintln!("Failed to load `.env` file: {error}");
	}

	let _guard = logging::init().context("initialize logging")?;
	let config = Config::new().context("load config")?;

	tracing::debug!(?config, "loaded configuration");

	if cfg!(not(feature = "production")) {
		tracing::warn!("running in development mode");
	}

	quiz_leaderboard::run(config).await
}
