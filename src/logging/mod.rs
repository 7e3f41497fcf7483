//! Log-capturing facilities.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod stderr;
mod files;

/// Initializes [`tracing-subscriber`].
///
/// Logs always go to stderr. If `LOG_DIR` is set, they are also written to daily rotated files
/// in that directory.
///
/// NOTE: the returned [`WorkerGuard`] will perform cleanup for the tracing layer that emits logs
///       to files, which means it has to stay alive until the program exits!
///
/// [`tracing-subscriber`]: tracing_subscriber
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
	let (files_layer, guard) = files::layer()
		.context("files layer")?
		.map(|(layer, guard, log_dir)| (Some(layer), Some((guard, log_dir))))
		.unwrap_or((None, None));

	let registry = tracing_subscriber::registry()
		.with(stderr::layer())
		.with(files_layer);

	#[cfg(feature = "console")]
	let registry = {
		use tracing_subscriber::{EnvFilter, Layer};
		registry.with(console_subscriber::spawn().with_filter(EnvFilter::new("tokio=trace")))
	};

	registry.init();

	let Some((guard, log_dir)) = guard else {
		tracing::info!("initialized logging");
		return Ok(None);
	};

	tracing::info!(dir = %log_dir.display(), "initialized logging");

	Ok(Some(guard))
}
