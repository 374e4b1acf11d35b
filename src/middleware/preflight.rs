//! Short-circuiting of CORS preflight requests.
//!
//! Browsers send an `OPTIONS` request before certain cross-origin
//! requests. Those never need routing: the gate answers them directly
//! with `204 No Content` and an empty body, with the header decision for
//! the request already applied, so an allow-listed caller gets its
//! permission headers straight from the preflight response.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::future::{self, Either, Ready};

use crate::State;

/// Creates a [`PreflightLayer`].
pub fn layer(state: Arc<State>) -> PreflightLayer {
	PreflightLayer::new(state)
}

/// A layer producing the [`Preflight`] service.
#[derive(Debug, Clone)]
pub struct PreflightLayer {
	/// Shared application state, for reading the allow-list.
	state: Arc<State>,
}

impl PreflightLayer {
	/// Creates a new [`PreflightLayer`].
	pub fn new(state: Arc<State>) -> Self {
		Self { state }
	}
}

impl<S> tower::Layer<S> for PreflightLayer {
	type Service = Preflight<S>;

	fn layer(&self, inner: S) -> Self::Service {
		Preflight {
			state: Arc::clone(&self.state),
			inner,
		}
	}
}

/// A middleware that answers `OPTIONS` requests before they reach the
/// router.
#[derive(Debug, Clone)]
pub struct Preflight<S> {
	/// Shared application state.
	state: Arc<State>,

	/// The service handling every other request.
	inner: S,
}

impl<S> tower::Service<Request> for Preflight<S>
where
	S: tower::Service<Request, Response = Response>,
{
	type Response = Response;
	type Error = S::Error;
	type Future = Either<Ready<Result<Response, S::Error>>, S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: Request) -> Self::Future {
		if request.method() != Method::OPTIONS {
			return Either::Right(self.inner.call(request));
		}

		let decision = super::decide_for_request(&self.state, &request);
		let mut response = StatusCode::NO_CONTENT.into_response();

		decision.apply(response.headers_mut());

		tracing::debug! {
			target: "multidomain::http",
			origin_allowed = decision.origin_allowed(),
			"short-circuited preflight request",
		};

		Either::Left(future::ready(Ok(response)))
	}
}
