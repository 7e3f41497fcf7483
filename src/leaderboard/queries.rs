//! SQL queries for the `leaderboard` table.

/// Selects the best entries, highest score first, most recent first among ties.
///
/// Binds: `$1` = limit
pub(super) static SELECT_TOP: &str = r#"
	SELECT
	  player_name,
	  score,
	  completed_at::date AS date
	FROM
	  leaderboard
	ORDER BY
	  score DESC,
	  completed_at DESC
	LIMIT
	  $1
"#;

/// Inserts a new entry, letting the database assign the completion time.
///
/// Binds: `$1` = player name, `$2` = score
pub(super) static INSERT: &str = r#"
	INSERT INTO
	  leaderboard (player_name, score)
	VALUES
	  ($1, $2)
	RETURNING
	  player_name,
	  score,
	  completed_at::date AS date
"#;
