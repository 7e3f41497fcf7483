//! Types for modeling leaderboard entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{Error, Result};

/// A single entry on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[schema(example = json!({
  "player_name": "Anubis",
  "score": 950,
  "date": "2026-10-19"
}))]
pub struct LeaderboardEntry {
	/// The name the player submitted their score under.
	pub player_name: String,

	/// The player's score.
	pub score: i32,

	/// The day the quiz was completed on.
	pub date: NaiveDate,
}

/// Request body for submitting a new score.
///
/// Missing fields fall back to their defaults, which means a missing `name` is rejected while a
/// missing `score` counts as `0`.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({ "name": "Anubis", "score": 950 }))]
pub struct Submission {
	/// The player's name.
	#[serde(default)]
	pub name: Option<String>,

	/// The player's score.
	#[serde(default)]
	pub score: i32,
}

/// A validated leaderboard submission, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
	/// Never empty.
	player_name: String,

	/// Never negative.
	score: i32,
}

impl NewEntry {
	/// Validates a name and score.
	#[track_caller]
	pub fn new(player_name: String, score: i32) -> Result<Self> {
		if player_name.is_empty() {
			return Err(Error::invalid_data().context("`name` cannot be empty"));
		}

		if score < 0 {
			return Err(Error::invalid_data().context(format!("`score` cannot be negative ({score})")));
		}

		Ok(Self { player_name, score })
	}

	/// Decodes and validates a raw JSON request body.
	///
	/// Malformed JSON is rejected the same way as invalid field values.
	pub fn from_json(body: &[u8]) -> Result<Self> {
		let Submission { name, score } =
			serde_json::from_slice(body).map_err(|err| Error::invalid_data().context(err))?;

		Self::new(name.unwrap_or_default(), score)
	}

	/// The player's name.
	pub fn player_name(&self) -> &str {
		&self.player_name
	}

	/// The player's score.
	pub const fn score(&self) -> i32 {
		self.score
	}
}
