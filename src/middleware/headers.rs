//! Response header policy.
//!
//! Runs the decision engine once per request and writes the outcome onto
//! the response after the inner service has produced it. This is the only
//! place decision headers are written for non-preflight requests, so the
//! policy applies uniformly to content and admin endpoints alike, and a
//! decision is never applied twice.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{self, Poll};

use axum::extract::Request;
use axum::response::Response;
use pin_project::pin_project;

use crate::cors::CorsDecision;
use crate::State;

/// Creates a [`HeaderPolicyLayer`].
pub fn layer(state: Arc<State>) -> HeaderPolicyLayer {
	HeaderPolicyLayer::new(state)
}

/// A layer producing the [`HeaderPolicy`] service.
#[derive(Debug, Clone)]
pub struct HeaderPolicyLayer {
	/// Shared application state, for reading the allow-list.
	state: Arc<State>,
}

impl HeaderPolicyLayer {
	/// Creates a new [`HeaderPolicyLayer`].
	pub fn new(state: Arc<State>) -> Self {
		Self { state }
	}
}

impl<S> tower::Layer<S> for HeaderPolicyLayer {
	type Service = HeaderPolicy<S>;

	fn layer(&self, inner: S) -> Self::Service {
		HeaderPolicy {
			state: Arc::clone(&self.state),
			inner,
		}
	}
}

/// A middleware that decorates responses with the decision headers.
#[derive(Debug, Clone)]
pub struct HeaderPolicy<S> {
	/// Shared application state.
	state: Arc<State>,

	/// The service producing the response to decorate.
	inner: S,
}

impl<S> tower::Service<Request> for HeaderPolicy<S>
where
	S: tower::Service<Request, Response = Response>,
{
	type Response = Response;
	type Error = S::Error;
	type Future = ResponseFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: Request) -> Self::Future {
		let decision = super::decide_for_request(&self.state, &request);

		ResponseFuture {
			inner: self.inner.call(request),
			decision: Some(decision),
		}
	}
}

/// Future for [`HeaderPolicy`] responses.
#[pin_project]
pub struct ResponseFuture<F> {
	/// The inner service's future.
	#[pin]
	inner: F,

	/// The decision to apply once the response exists.
	decision: Option<CorsDecision>,
}

impl<F, E> Future for ResponseFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
		let this = self.project();
		let result = task::ready!(this.inner.poll(cx));

		Poll::Ready(result.map(|mut response| {
			if let Some(decision) = this.decision.take() {
				decision.apply(response.headers_mut());
			}

			response
		}))
	}
}

#[cfg(test)]
mod tests {
	use std::convert::Infallible;

	use axum::body::Body;
	use axum::http::{header, HeaderValue, Request, StatusCode};
	use axum::response::{Html, IntoResponse};
	use tower::{service_fn, Layer, ServiceExt};

	use super::HeaderPolicyLayer;
	use crate::State;

	#[tokio::test]
	async fn allowed_hosts_get_the_full_header_set() -> color_eyre::Result<()> {
		let request = Request::builder()
			.uri("/some/page")
			.header(header::HOST, "www.example.com")
			.body(Body::empty())?;

		let response = HeaderPolicyLayer::new(State::testing("example.com\nfoo.bar"))
			.layer(service_fn(|_| async {
				Ok::<_, Infallible>(Html("hello").into_response())
			}))
			.oneshot(request)
			.await?;

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(
			response
				.headers()
				.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
				.and_then(|value| value.to_str().ok()),
			Some("https://example.com"),
		);
		assert_eq!(
			response.headers().get(header::VARY),
			Some(&HeaderValue::from_static("Origin")),
		);
		assert!(response
			.headers()
			.contains_key("access-control-allow-private-network"));

		Ok(())
	}

	#[tokio::test]
	async fn unknown_hosts_get_no_cors_headers() -> color_eyre::Result<()> {
		let request = Request::builder()
			.uri("/some/page")
			.header(header::HOST, "evil.example")
			.body(Body::empty())?;

		let response = HeaderPolicyLayer::new(State::testing("example.com"))
			.layer(service_fn(|_| async {
				Ok::<_, Infallible>(Html("hello").into_response())
			}))
			.oneshot(request)
			.await?;

		assert!(!response
			.headers()
			.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

		Ok(())
	}

	#[tokio::test]
	async fn font_assets_get_their_mime_type_even_over_inner_headers() -> color_eyre::Result<()> {
		let request = Request::builder()
			.uri("/static/fonts/site.woff2")
			.header(header::HOST, "evil.example")
			.body(Body::empty())?;

		let response = HeaderPolicyLayer::new(State::testing("example.com"))
			.layer(service_fn(|_| async {
				Ok::<_, Infallible>(Html("not actually html").into_response())
			}))
			.oneshot(request)
			.await?;

		assert_eq!(
			response
				.headers()
				.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
				.and_then(|value| value.to_str().ok()),
			Some("*"),
		);
		assert_eq!(
			response
				.headers()
				.get(header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok()),
			Some("application/font-woff2"),
		);

		Ok(())
	}
}
