//! Custom response types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Wrapper struct for turning any `T` into a [Response] with status code 201.
///
/// [Response]: axum::response::Response
#[derive(Debug)]
pub struct Created<T>(pub T);

impl<T> IntoResponse for Created<T>
where
	T: IntoResponse,
{
	fn into_response(self) -> Response {
		(StatusCode::CREATED, self.0).into_response()
	}
}
