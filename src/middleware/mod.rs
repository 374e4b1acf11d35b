//! This module contains the service's middleware.
//!
//! Middlewares are implemented as [tower services], composed explicitly in
//! [`crate::router()`]. The chain has a defined order: panics are caught
//! outermost, requests are logged, `OPTIONS` requests terminate at the
//! preflight gate, and the header policy decorates every response that
//! makes it past the gate.
//!
//! [tower services]: tower::Service

use axum::extract::Request;
use axum::http::header;

use crate::cors::{self, CorsDecision};
use crate::State;

pub(crate) mod logging;
pub(crate) mod panic_handler;

pub mod preflight;
pub use preflight::PreflightLayer;

pub mod headers;
pub use headers::HeaderPolicyLayer;

/// Runs the decision engine for a request.
///
/// The host is taken from the request's `Host` header, falling back to the
/// configured public URL when absent, and the allow-list is read fresh
/// from the store so administrative edits apply immediately.
pub(crate) fn decide_for_request(state: &State, request: &Request) -> CorsDecision {
	let host = request
		.headers()
		.get(header::HOST)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_else(|| state.config.fallback_host());

	let request_uri = request
		.uri()
		.path_and_query()
		.map_or("/", |path_and_query| path_and_query.as_str());

	cors::decide(host, request_uri, &state.allow_list().get())
}
