//! Everything related to [OpenAPI].
//!
//! This project uses the [`utoipa`] crate for generating an OpenAPI specification from code.
//! The [`Spec`] struct in this module lists out all the relevant types, routes, and other metadata
//! that will be included in the spec.
//!
//! [OpenAPI]: https://spec.openapis.org/oas/latest.html

use axum::Json;
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use utoipa::OpenApi;

#[derive(Debug, Clone, Deref, DerefMut, OpenApi)]
#[openapi(
  info(
    title = "Quiz Leaderboard",
    description = "Top scores for the quiz.",
  ),
  paths(
    crate::leaderboard::routes::get,
    crate::leaderboard::routes::create,
  ),
  components(
    schemas(
      crate::leaderboard::LeaderboardEntry,
      crate::leaderboard::Submission,
      crate::error::ErrorBody,
    ),
  ),
  tags((name = "Leaderboard", description = "Reading and submitting scores")),
)]
#[allow(missing_docs)]
pub struct Spec(utoipa::openapi::OpenApi);

impl Spec {
	/// Creates a new [`Spec`].
	pub fn new() -> Self {
		Self(Self::openapi())
	}

	/// Returns an iterator over the registered routes and their allowed HTTP methods.
	pub fn routes(&self) -> impl Iterator<Item = (&str, String)> {
		self.paths.paths.iter().map(|(path, handler)| {
			let methods = handler
				.operations
				.keys()
				.map(|method| format!("{method:?}").to_uppercase())
				.join(", ");

			(path.as_str(), methods)
		})
	}

	/// Generates a JSON representation of this OpenAPI spec.
	pub fn as_json(&self) -> serde_json::Result<String> {
		self.to_pretty_json()
	}
}

/// Serves the OpenAPI spec as JSON.
pub(crate) async fn serve() -> Json<utoipa::openapi::OpenApi> {
	Json(Spec::openapi())
}
