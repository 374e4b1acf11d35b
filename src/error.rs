//! Runtime errors.
//!
//! The header decision engine itself has no failure modes; everything that
//! can go wrong at runtime lives at the HTTP surface. This module exposes
//! the [`Error`] type used there, along with a [`Result`] alias that sets
//! it as the default `E` parameter.
//!
//! [`Error`] implements [`IntoResponse`], so it can be returned from HTTP
//! handlers and middleware directly.
//!
//! [`Error`]: struct@Error

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Type alias for a [`Result<T, E>`] with its `E` parameter set to [`Error`].
///
/// [`Result`]: std::result::Result
/// [`Error`]: struct@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The service's core error type.
///
/// Any errors that ever reach the outside should be this type. It
/// implements [`IntoResponse`], producing a JSON body with a `message`
/// field and an appropriate status code.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
	/// The kind of error that occurred.
	kind: ErrorKind,
}

/// The different kinds of errors that can occur at runtime.
#[allow(clippy::missing_docs_in_private_items)]
#[derive(Debug, Error)]
enum ErrorKind {
	#[error("invalid request body")]
	InvalidBody(#[from] JsonRejection),

	#[error("something unexpected happened; please report this incident")]
	Internal,
}

impl Error {
	/// An error for situations that should not happen, like a panicking
	/// handler.
	///
	/// Produces a `500 Internal Server Error` status.
	pub(crate) fn internal() -> Self {
		Self {
			kind: ErrorKind::Internal,
		}
	}
}

impl From<JsonRejection> for Error {
	fn from(rejection: JsonRejection) -> Self {
		Self {
			kind: ErrorKind::InvalidBody(rejection),
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let message = self.kind.to_string();
		let status = match &self.kind {
			ErrorKind::InvalidBody(_) => StatusCode::BAD_REQUEST,
			ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
		};

		if status.is_server_error() {
			tracing::error!(error = %self, "internal server error occurred");
		} else {
			tracing::debug!(error = %self, "returning error from request handler");
		}

		(status, Json(json!({ "message": message }))).into_response()
	}
}
