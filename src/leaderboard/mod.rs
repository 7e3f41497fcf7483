//! The quiz leaderboard.
//!
//! Clients can fetch the best entries with `GET` and submit new scores with `POST`.
//! Entries are never updated or deleted.

use axum::{routing, Router};

use crate::State;

mod queries;

pub mod models;
pub use models::{LeaderboardEntry, NewEntry, Submission};

pub mod store;
pub use store::{LeaderboardStore, PgStore};

pub mod routes;

/// The maximum number of entries returned when fetching the leaderboard.
pub const LEADERBOARD_SIZE: u32 = 10;

/// Returns a router with routes for the leaderboard.
///
/// The same handlers are served at `/` and `/leaderboard`.
pub fn router(state: &'static State) -> Router {
	let leaderboard = routing::get(routes::get)
		.post(routes::create)
		.fallback(routes::method_not_allowed);

	Router::new()
		.route("/", leaderboard.clone())
		.route("/leaderboard", leaderboard)
		.with_state(state)
}
