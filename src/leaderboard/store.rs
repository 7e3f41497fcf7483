//! Persistence for leaderboard entries.
//!
//! The service holds no connections between requests. Every call on a [`PgStore`] opens its own
//! connection and closes it again before returning, no matter whether the query succeeded.
//! If the calling future is dropped halfway through, dropping the connection closes the socket.

use std::str::FromStr;

use axum::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection, PgConnection};
use url::Url;

use super::{queries, LeaderboardEntry, NewEntry};
use crate::Result;

/// A backing store for leaderboard entries.
#[async_trait]
pub trait LeaderboardStore: Send + Sync + 'static {
	/// Fetches the `limit` best entries.
	///
	/// Entries are ordered by score, highest first. Entries with equal scores are ordered by
	/// completion time, most recent first.
	async fn top_entries(&self, limit: u32) -> Result<Vec<LeaderboardEntry>>;

	/// Persists a new entry and returns it as stored.
	///
	/// The completion time is assigned by the store.
	async fn insert_entry(&self, entry: &NewEntry) -> Result<LeaderboardEntry>;
}

/// A [`LeaderboardStore`] backed by a PostgreSQL `leaderboard` table.
#[derive(Debug, Clone)]
pub struct PgStore {
	/// Options used for every new connection.
	options: PgConnectOptions,
}

impl PgStore {
	/// Creates a new [`PgStore`] for the database at the given URL.
	///
	/// This only validates the URL; no connection is established until the first query.
	pub fn new(database_url: &Url) -> Result<Self, sqlx::Error> {
		let options = PgConnectOptions::from_str(database_url.as_str())?;

		Ok(Self { options })
	}

	/// Creates a new [`PgStore`] from pre-built connection options.
	#[cfg(test)]
	pub(crate) const fn from_options(options: PgConnectOptions) -> Self {
		Self { options }
	}

	/// Opens a fresh connection.
	#[tracing::instrument(level = "trace", skip(self), err(level = "debug"))]
	async fn connect(&self) -> Result<PgConnection> {
		let connection = self.options.connect().await?;

		Ok(connection)
	}
}

/// Closes a connection, logging if that fails.
async fn release(connection: PgConnection) {
	if let Err(error) = connection.close().await {
		tracing::warn!(%error, "failed to close database connection");
	}
}

/// Inserts an entry inside a transaction on the given connection.
async fn insert(connection: &mut PgConnection, entry: &NewEntry) -> Result<LeaderboardEntry> {
	let mut transaction = connection.begin().await?;

	let inserted = sqlx::query_as::<_, LeaderboardEntry>(queries::INSERT)
		.bind(entry.player_name())
		.bind(entry.score())
		.fetch_one(&mut *transaction)
		.await?;

	transaction.commit().await?;

	Ok(inserted)
}

#[async_trait]
impl LeaderboardStore for PgStore {
	#[tracing::instrument(level = "debug", skip(self))]
	async fn top_entries(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
		let mut connection = self.connect().await?;

		let entries = sqlx::query_as::<_, LeaderboardEntry>(queries::SELECT_TOP)
			.bind(i64::from(limit))
			.fetch_all(&mut connection)
			.await;

		release(connection).await;

		Ok(entries?)
	}

	#[tracing::instrument(level = "debug", skip(self))]
	async fn insert_entry(&self, entry: &NewEntry) -> Result<LeaderboardEntry> {
		let mut connection = self.connect().await?;
		let inserted = insert(&mut connection, entry).await;

		release(connection).await;

		inserted
	}
}
