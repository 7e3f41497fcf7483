//! Tests for the full HTTP service.
//!
//! Requests are sent straight into the router, which is backed by an in-memory store unless a
//! test needs a real database.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{self, AtomicUsize};
use std::sync::{Arc, Mutex};

use axum::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;

use crate::leaderboard::{LeaderboardEntry, LeaderboardStore, NewEntry};
use crate::{Config, State};

mod postgres;

/// A row in the [`MemoryStore`].
#[derive(Debug)]
struct Row {
	/// The stored entry.
	entry: LeaderboardEntry,

	/// Stands in for the completion timestamp; later inserts get higher values.
	completed_at: usize,
}

/// An in-memory [`LeaderboardStore`] that keeps track of how often it was used.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
	/// The stored rows, in insertion order.
	rows: Mutex<Vec<Row>>,

	/// How many times a "connection" was acquired.
	connections: AtomicUsize,
}

impl MemoryStore {
	/// Inserts entries without counting as store usage.
	pub(crate) fn seed(&self, entries: &[(&str, i32)]) {
		let mut rows = self.rows.lock().unwrap();

		for &(player_name, score) in entries {
			let completed_at = rows.len();

			rows.push(Row {
				entry: LeaderboardEntry {
					player_name: player_name.to_owned(),
					score,
					date: Utc::now().date_naive(),
				},
				completed_at,
			});
		}
	}

	/// The number of stored rows.
	pub(crate) fn len(&self) -> usize {
		self.rows.lock().unwrap().len()
	}

	/// How many times the store was asked to do anything.
	pub(crate) fn connections(&self) -> usize {
		self.connections.load(atomic::Ordering::SeqCst)
	}
}

#[async_trait]
impl LeaderboardStore for Arc<MemoryStore> {
	async fn top_entries(&self, limit: u32) -> crate::Result<Vec<LeaderboardEntry>> {
		self.connections.fetch_add(1, atomic::Ordering::SeqCst);

		let rows = self.rows.lock().unwrap();
		let mut ranked = rows.iter().collect::<Vec<_>>();

		ranked.sort_by(|a, b| {
			b.entry
				.score
				.cmp(&a.entry.score)
				.then(b.completed_at.cmp(&a.completed_at))
		});

		Ok(ranked
			.into_iter()
			.take(usize::try_from(limit).unwrap())
			.map(|row| row.entry.clone())
			.collect())
	}

	async fn insert_entry(&self, entry: &NewEntry) -> crate::Result<LeaderboardEntry> {
		self.connections.fetch_add(1, atomic::Ordering::SeqCst);
		self.seed(&[(entry.player_name(), entry.score())]);

		let rows = self.rows.lock().unwrap();

		Ok(rows.last().unwrap().entry.clone())
	}
}

/// A store whose database is unreachable.
#[derive(Debug)]
pub(crate) struct UnreachableStore;

#[async_trait]
impl LeaderboardStore for UnreachableStore {
	async fn top_entries(&self, _limit: u32) -> crate::Result<Vec<LeaderboardEntry>> {
		Err(sqlx::Error::PoolTimedOut.into())
	}

	async fn insert_entry(&self, _entry: &NewEntry) -> crate::Result<LeaderboardEntry> {
		Err(sqlx::Error::Protocol(String::from("connection reset")).into())
	}
}

/// A store with a bug in it.
#[derive(Debug)]
pub(crate) struct PanickingStore;

#[async_trait]
impl LeaderboardStore for PanickingStore {
	async fn top_entries(&self, _limit: u32) -> crate::Result<Vec<LeaderboardEntry>> {
		panic!("top_entries exploded");
	}

	async fn insert_entry(&self, _entry: &NewEntry) -> crate::Result<LeaderboardEntry> {
		panic!("insert_entry exploded");
	}
}

/// Test "context" bundling a router with the store behind it.
pub(crate) struct Context {
	/// The in-memory store, if the router is backed by one.
	pub store: Arc<MemoryStore>,

	/// The full HTTP service.
	app: Router,
}

impl Context {
	/// A service backed by an empty in-memory store.
	pub fn new() -> Self {
		let store = Arc::new(MemoryStore::default());
		let state = State::with_store(config(), Some(Box::new(Arc::clone(&store))));

		Self { store, app: crate::app(state) }
	}

	/// A service without any database configured.
	pub fn unconfigured() -> Self {
		let store = Arc::new(MemoryStore::default());
		let state = State::with_store(config(), None);

		Self { store, app: crate::app(state) }
	}

	/// A service backed by the given store.
	pub fn with_store<S>(store: S) -> Self
	where
		S: LeaderboardStore,
	{
		let state = State::with_store(config(), Some(Box::new(store)));

		Self {
			store: Arc::new(MemoryStore::default()),
			app: crate::app(state),
		}
	}

	/// Sends a request to `/leaderboard`.
	pub async fn request(&self, method: Method, body: Option<&str>) -> Response {
		self.request_to("/leaderboard", method, body).await
	}

	/// Sends a request to the given path.
	pub async fn request_to(&self, path: &str, method: Method, body: Option<&str>) -> Response {
		let mut request = Request::builder().method(method).uri(path);

		if body.is_some() {
			request = request.header("content-type", "application/json");
		}

		let request = request
			.body(body.map(|body| Body::from(body.to_owned())).unwrap_or_default())
			.unwrap();

		self.app.clone().oneshot(request).await.unwrap()
	}
}

/// A configuration for tests; nothing in it is ever used to connect anywhere.
fn config() -> Config {
	Config {
		addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
		database_url: None,
	}
}

/// Reads a response body as a string.
pub(crate) async fn body_text(response: Response) -> String {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();

	String::from_utf8(bytes.to_vec()).unwrap()
}

/// Reads a response body as JSON.
pub(crate) async fn body_json(response: Response) -> serde_json::Value {
	serde_json::from_str(&body_text(response).await).unwrap()
}

#[ctor::ctor]
fn setup() {
	use std::{env, io};

	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::EnvFilter;

	if let Ok(rust_log) = env::var("RUST_TEST_LOG") {
		tracing_subscriber::fmt()
			.with_target(true)
			.with_writer(io::stderr)
			.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
			.compact()
			.with_env_filter(EnvFilter::new(rust_log))
			.init();
	}

	let _ = ::dotenvy::dotenv();
}
