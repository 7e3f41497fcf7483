//! Runtime errors.
//!
//! This module exposes the [`Error`] type that is used across the code base for bubbling up
//! errors. Any foreign errors that can occur at runtime can be turned into an [`Error`]. Specific
//! error cases have dedicated constructors, see all the public methods on [`Error`].
//!
//! [`Error`] implements [`IntoResponse`], which means it can be returned from HTTP handlers,
//! middleware, etc. The response body is always the same envelope: `{"error": "<message>"}`.
//!
//! This module also exposes a [`Result`] type alias, which sets [`Error`] as the default `E` type
//! parameter.
//!
//! [`Error`]: struct@Error

use std::fmt::{self, Formatter};
use std::panic::Location;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use derive_more::Display;
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Type alias for a [`Result<T, E>`] with its `E` parameter set to [`Error`].
///
/// [`Result`]: std::result::Result
/// [`Error`]: struct@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The service's core error type.
///
/// Any errors that ever reach the outside should be this type.
/// It carries information about the kind of error that occurred, where it occurred, and any extra
/// information like error sources or debug messages.
#[derive(Debug, Error)]
pub struct Error {
	/// The kind of error that occurred.
	///
	/// This is used for determining the HTTP status code and error message for the response
	/// body, when an error is returned from a request.
	kind: ErrorKind,

	/// The source code location of where the error occurred.
	///
	/// This is used for debugging / troubleshooting, and is included in logs.
	location: Location<'static>,

	/// Extra information about the error, like source errors or debug messages.
	///
	/// Attachments are logged, but never sent to the client.
	attachments: Vec<Attachment>,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self {
			kind,
			location,
			attachments,
		} = self;

		write!(f, "[{location}] {kind}")?;

		if !attachments.is_empty() {
			write!(f, ":")?;

			for attachment in attachments.iter().rev() {
				write!(f, "\n  - {attachment}")?;
			}
		}

		Ok(())
	}
}

/// The different kinds of errors that can occur at runtime.
///
/// The `Display` implementation of each variant is the message clients see.
#[allow(clippy::missing_docs_in_private_items)]
#[derive(Debug, Error)]
enum ErrorKind {
	#[error("Database configuration error")]
	DatabaseConfiguration,

	#[error("Invalid data")]
	InvalidData,

	#[error("Method not allowed")]
	MethodNotAllowed,

	#[error("Not found")]
	NotFound,

	#[error("Internal server error")]
	Database(#[from] sqlx::Error),

	#[error("Internal server error")]
	Panic,
}

#[allow(clippy::missing_docs_in_private_items)]
type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Generic error attachments.
#[derive(Debug, Display)]
#[display("'{context}' at {location}")]
struct Attachment {
	/// The attachment context.
	///
	/// This could be a more concrete error type, e.g. from a third party crate, or simply an
	/// error message.
	context: BoxedError,

	/// The source code location of where this attachment was created.
	location: Location<'static>,
}

impl Attachment {
	/// Creates a new [`Attachment`].
	#[track_caller]
	fn new<C>(context: C) -> Self
	where
		C: Into<BoxedError>,
	{
		Self {
			context: context.into(),
			location: *Location::caller(),
		}
	}
}

/// The JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({ "error": "Invalid data" }))]
pub struct ErrorBody {
	/// A human readable error message.
	pub error: String,
}

impl Error {
	/// Creates a new [`Error`] of the given [`ErrorKind`].
	///
	/// [`Error`]: struct@Error
	#[track_caller]
	fn new<E>(kind: E) -> Self
	where
		E: Into<ErrorKind>,
	{
		Self {
			kind: kind.into(),
			location: *Location::caller(),
			attachments: Vec::new(),
		}
	}

	/// Attach additional context to an error.
	///
	/// This can be another, more concrete, error type, or simply an error message.
	/// If `ctx` is also an [`Error`], it will have its attachments transferred to `self`.
	///
	/// [`Error`]: struct@Error
	#[track_caller]
	pub(crate) fn context<E>(mut self, ctx: E) -> Self
	where
		E: Into<BoxedError>,
	{
		match Into::<BoxedError>::into(ctx).downcast::<Self>() {
			Ok(mut err) => {
				self.attachments.append(&mut err.attachments);
				self.attachments.push(Attachment::new(err.kind));
			}
			Err(other) => {
				self.attachments.push(Attachment::new(other));
			}
		}

		self
	}

	/// An error signaling that no database connection string was configured.
	///
	/// Produces a `500 Internal Server Error` status.
	#[track_caller]
	pub(crate) fn database_configuration() -> Self {
		Self::new(ErrorKind::DatabaseConfiguration)
	}

	/// An error signaling a rejected leaderboard submission.
	///
	/// This covers undecodable bodies, empty names, and negative scores alike.
	///
	/// Produces a `400 Bad Request` status.
	#[track_caller]
	pub(crate) fn invalid_data() -> Self {
		Self::new(ErrorKind::InvalidData)
	}

	/// Produces a `405 Method Not Allowed` status.
	#[track_caller]
	pub(crate) fn method_not_allowed() -> Self {
		Self::new(ErrorKind::MethodNotAllowed)
	}

	/// Produces a `404 Not Found` status.
	#[track_caller]
	pub(crate) fn not_found() -> Self {
		Self::new(ErrorKind::NotFound)
	}

	/// An error signaling that a request handler panicked.
	///
	/// Produces a `500 Internal Server Error` status.
	#[track_caller]
	pub(crate) fn panic() -> Self {
		Self::new(ErrorKind::Panic)
	}

	/// The HTTP status code this error maps to.
	pub fn status(&self) -> StatusCode {
		match self.kind {
			ErrorKind::InvalidData => StatusCode::BAD_REQUEST,
			ErrorKind::NotFound => StatusCode::NOT_FOUND,
			ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
			ErrorKind::DatabaseConfiguration | ErrorKind::Database(_) | ErrorKind::Panic => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl IntoResponse for Error {
	#[track_caller]
	fn into_response(self) -> Response {
		let status = self.status();
		let message = self.kind.to_string();

		if status.is_server_error() {
			tracing::error!(error = %self, "internal server error occurred");
		} else {
			tracing::debug! {
				location = %self.location,
				kind = ?self.kind,
				attachments = ?self.attachments.iter().rev().map(ToString::to_string).collect_vec(),
				error_message = %message,
				"returning error from request handler"
			};
		}

		(status, Json(ErrorBody { error: message })).into_response()
	}
}

impl From<sqlx::Error> for Error {
	#[track_caller]
	fn from(error: sqlx::Error) -> Self {
		Self::new(error)
	}
}
