//! CORS middlewares.

use std::time::Duration;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// How long browsers may cache a preflight response.
const MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24);

/// Creates a CORS layer that lets any origin read and submit scores.
///
/// Every `OPTIONS` request is answered by the layer itself, so preflights never reach a handler
/// and never touch the database.
pub fn permissive() -> CorsLayer {
	CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([header::CONTENT_TYPE])
		.max_age(MAX_AGE)
}
