//! This module contains a configured [`CatchPanicLayer`], which will catch
//! panics and produce a proper HTTP response from them.
//!
//! Normally, if an HTTP handler panics, the connection will simply be closed.
//! This middleware will prevent that from happening.

use std::any::Any;

use axum::http::Response;
use axum::response::IntoResponse;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use crate::Error;

/// Creates a middleware layer for catching panics and turning them into
/// responses.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
	CatchPanicLayer::custom(PanicHandler)
}

/// A custom panic handler for [`CatchPanicLayer`].
#[derive(Debug, Clone, Copy)]
pub struct PanicHandler;

impl ResponseForPanic for PanicHandler {
	type ResponseBody = axum::body::Body;

	#[tracing::instrument(target = "quiz_leaderboard::http", name = "panic_handler", skip_all)]
	fn response_for_panic(
		&mut self,
		error: Box<dyn Any + Send + 'static>,
	) -> Response<Self::ResponseBody> {
		let error = error
			.downcast_ref::<&str>()
			.copied()
			.or_else(|| error.downcast_ref::<String>().map(|s| s.as_str()));

		tracing::error!(?error, "handler panicked");

		Error::panic().into_response()
	}
}
