//! Tests for [`PgStore`] against a real database.
//!
//! These only run if `TEST_DATABASE_URL` points at a PostgreSQL server. Every test gets its own
//! schema, which is dropped again afterwards.

use std::env;
use std::str::FromStr;

use anyhow::Context as _;
use chrono::Utc;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, Executor, PgConnection};
use uuid::Uuid;

use crate::leaderboard::{LeaderboardStore, NewEntry, PgStore, LEADERBOARD_SIZE};

/// The table definition every test schema starts out with.
static SCHEMA: &str = include_str!("../../database/schema.sql");

/// A freshly created schema and a store pointing at it.
///
/// The store's sessions run in UTC, so dates it returns can be compared against [`Utc::now()`].
struct TestDatabase {
	/// Connection options for the database, without a search path.
	options: PgConnectOptions,

	/// The name of this test's schema.
	schema: String,

	/// A store that only sees this test's schema.
	store: PgStore,
}

impl TestDatabase {
	/// Creates a new schema, or returns `None` if no test database is configured.
	async fn new() -> anyhow::Result<Option<Self>> {
		let Ok(url) = env::var("TEST_DATABASE_URL") else {
			eprintln!("`TEST_DATABASE_URL` is not set; skipping");
			return Ok(None);
		};

		let options = PgConnectOptions::from_str(&url).context("parse `TEST_DATABASE_URL`")?;
		let schema = format!("leaderboard_test_{}", Uuid::now_v7().simple());
		let mut connection = PgConnection::connect_with(&options).await?;

		connection
			.execute(format!("CREATE SCHEMA {schema}; SET search_path TO {schema};").as_str())
			.await?;

		connection.execute(SCHEMA).await.context("create table")?;
		connection.close().await?;

		let store = PgStore::from_options(
			options
				.clone()
				.options([("search_path", schema.as_str()), ("timezone", "UTC")]),
		);

		Ok(Some(Self { options, schema, store }))
	}

	/// Counts the rows in this test's table.
	async fn count(&self) -> anyhow::Result<i64> {
		let mut connection = PgConnection::connect_with(&self.options).await?;
		let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}.leaderboard", self.schema))
			.fetch_one(&mut connection)
			.await?;

		connection.close().await?;

		Ok(count)
	}

	/// Drops this test's schema.
	async fn cleanup(self) -> anyhow::Result<()> {
		let mut connection = PgConnection::connect_with(&self.options).await?;

		connection
			.execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
			.await?;

		connection.close().await?;

		Ok(())
	}
}

/// Builds a valid entry.
fn entry(name: &str, score: i32) -> NewEntry {
	NewEntry::new(name.to_owned(), score).unwrap()
}

#[tokio::test]
async fn insert_and_fetch() -> anyhow::Result<()> {
	let Some(db) = TestDatabase::new().await? else {
		return Ok(());
	};

	assert!(db.store.top_entries(LEADERBOARD_SIZE).await?.is_empty(), "table should be empty");

	let inserted = db.store.insert_entry(&entry("Anubis", 950)).await?;

	assert_eq!(inserted.player_name, "Anubis", "name");
	assert_eq!(inserted.score, 950, "score");
	assert_eq!(inserted.date, Utc::now().date_naive(), "date should be today in UTC");
	assert_eq!(db.count().await?, 1, "expected exactly one row");

	let entries = db.store.top_entries(LEADERBOARD_SIZE).await?;

	assert_eq!(entries, [inserted], "fetched entry should match the inserted one");

	db.cleanup().await
}

#[tokio::test]
async fn ordering_and_limit() -> anyhow::Result<()> {
	let Some(db) = TestDatabase::new().await? else {
		return Ok(());
	};

	for idx in 0..12 {
		db.store
			.insert_entry(&entry(&format!("player-{idx}"), idx * 100))
			.await?;
	}

	db.store.insert_entry(&entry("latecomer", 1100)).await?;

	let entries = db.store.top_entries(LEADERBOARD_SIZE).await?;
	let names = entries
		.iter()
		.map(|entry| entry.player_name.as_str())
		.collect::<Vec<_>>();

	assert_eq!(entries.len(), 10, "expected a full leaderboard");
	assert_eq!(
		names.first().copied(),
		Some("latecomer"),
		"most recent entry should win ties",
	);
	assert_eq!(names.get(1).copied(), Some("player-11"), "older tied entry should be second");
	assert!(
		entries.windows(2).all(|pair| matches!(pair, [a, b] if a.score >= b.score)),
		"entries should be sorted by score",
	);

	db.cleanup().await
}

#[tokio::test]
async fn unreachable_database() -> anyhow::Result<()> {
	let options = PgConnectOptions::new()
		.host("127.0.0.1")
		.port(1)
		.username("nobody");

	let store = PgStore::from_options(options);
	let error = store.top_entries(LEADERBOARD_SIZE).await.unwrap_err();

	assert_eq!(
		error.status(),
		axum::http::StatusCode::INTERNAL_SERVER_ERROR,
		"connection failures should be server errors",
	);

	Ok(())
}
