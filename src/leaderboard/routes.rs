//! Handlers for the leaderboard routes.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State as StateExtractor;
use axum::Json;

use super::{LeaderboardEntry, NewEntry, Submission, LEADERBOARD_SIZE};
use crate::error::ErrorBody;
use crate::responses::Created;
use crate::{Error, Result, State};

/// Fetch the leaderboard.
///
/// Returns at most 10 entries, ordered by score and then by completion date, both descending.
#[tracing::instrument(skip(state))]
#[utoipa::path(
  get,
  path = "/leaderboard",
  tag = "Leaderboard",
  responses(
    (status = 200, description = "The best entries.", body = [LeaderboardEntry]),
    (status = 500, description = "The database is not configured or unreachable.", body = ErrorBody),
  ),
)]
pub async fn get(
	StateExtractor(state): StateExtractor<&'static State>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
	let entries = state.store()?.top_entries(LEADERBOARD_SIZE).await?;

	tracing::debug!(count = entries.len(), "fetched leaderboard");

	Ok(Json(entries))
}

/// Submit a new score.
///
/// `name` must not be empty and `score` must not be negative. A missing `score` counts as `0`.
#[tracing::instrument(skip_all)]
#[utoipa::path(
  post,
  path = "/leaderboard",
  tag = "Leaderboard",
  request_body = Submission,
  responses(
    (status = 201, description = "The entry as it was stored.", body = LeaderboardEntry),
    (status = 400, description = "The submission was malformed or invalid.", body = ErrorBody),
    (status = 500, description = "The database is not configured or unreachable.", body = ErrorBody),
  ),
)]
pub async fn create(
	StateExtractor(state): StateExtractor<&'static State>,
	body: Result<Bytes, BytesRejection>,
) -> Result<Created<Json<LeaderboardEntry>>> {
	let store = state.store()?;
	let body = body.map_err(|rejection| Error::invalid_data().context(rejection))?;
	let new_entry = NewEntry::from_json(&body)?;
	let entry = store.insert_entry(&new_entry).await?;

	tracing::info! {
		player_name = %entry.player_name,
		score = entry.score,
		"created leaderboard entry",
	};

	Ok(Created(Json(entry)))
}

/// Rejects any method that isn't explicitly routed.
///
/// The database configuration is still checked first, like for every other non-preflight
/// request.
pub async fn method_not_allowed(StateExtractor(state): StateExtractor<&'static State>) -> Error {
	if let Err(error) = state.store() {
		return error;
	}

	Error::method_not_allowed()
}
