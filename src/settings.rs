//! The administrative settings surface.
//!
//! The allow-list is edited out-of-band by an external admin UI; this
//! router only exposes the raw value. Stored values are accepted
//! verbatim, whatever they contain. An entry that is not a valid host
//! simply never matches any request, so garbage degrades to a deny.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::Result;

/// The allow-list value as it travels over the admin surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllowedOrigins {
	/// The raw multi-line value; one origin per line.
	pub allowed_origins: String,
}

/// Builds the settings router.
pub fn router(state: Arc<crate::State>) -> Router {
	Router::new()
		.route("/origins", get(get_origins).put(update_origins))
		.with_state(state)
}

/// Returns the current allow-list value.
async fn get_origins(State(state): State<Arc<crate::State>>) -> Json<AllowedOrigins> {
	Json(AllowedOrigins {
		allowed_origins: state.allow_list().get(),
	})
}

/// Replaces the allow-list value.
///
/// The new value takes effect on the next request.
async fn update_origins(
	State(state): State<Arc<crate::State>>,
	body: Result<Json<AllowedOrigins>, JsonRejection>,
) -> Result<StatusCode> {
	let Json(AllowedOrigins { allowed_origins }) = body?;

	tracing::info! {
		target: "multidomain::audit_log",
		value = %allowed_origins,
		"updating allowed origins",
	};

	state.allow_list().set(allowed_origins);

	Ok(StatusCode::NO_CONTENT)
}
