//! The service's main application state.
//!
//! This is initialized once on startup, and then passed around the application by axum.

use anyhow::Context;
use derive_more::Debug;

use crate::leaderboard::{LeaderboardStore, PgStore};
use crate::{Config, Error, Result};

/// The main application state.
///
/// A `'static` reference to this is passed around the application.
#[derive(Debug)]
pub struct State {
	/// The service configuration.
	pub config: Config,

	/// Where leaderboard entries are stored.
	///
	/// This is `None` if no database was configured.
	#[debug(skip)]
	store: Option<Box<dyn LeaderboardStore>>,
}

impl State {
	/// Creates a new [`State`] object and leaks it on the heap.
	///
	/// If a database URL is configured, it is validated here, so that a malformed URL is caught
	/// before any request is routed. No connection is established.
	///
	/// **This function should only ever be called once; it leaks memory.**
	pub fn new(config: Config) -> anyhow::Result<&'static Self> {
		let store = match &config.database_url {
			None => {
				tracing::warn!("`DATABASE_URL` is not set; leaderboard requests will fail");
				None
			}
			Some(url) => {
				let store = PgStore::new(url).context("invalid `DATABASE_URL`")?;
				Some(Box::new(store) as Box<dyn LeaderboardStore>)
			}
		};

		Ok(Self::with_store(config, store))
	}

	/// Creates a new [`State`] object with a custom store and leaks it on the heap.
	pub fn with_store(config: Config, store: Option<Box<dyn LeaderboardStore>>) -> &'static Self {
		Box::leak(Box::new(Self { config, store }))
	}

	/// Returns the configured store, or a configuration error if there is none.
	#[track_caller]
	pub fn store(&self) -> Result<&dyn LeaderboardStore> {
		match self.store.as_deref() {
			Some(store) => Ok(store),
			None => Err(Error::database_configuration()),
		}
	}
}
