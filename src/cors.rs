//! The header decision engine.
//!
//! Everything in this module is a pure function of the request's declared
//! host, its URI, and the current allow-list value. The engine never
//! writes headers itself; it produces an ordered list of header writes,
//! and the middleware applies that list to the response in one place.
//!
//! Two independent checks feed the decision:
//!
//! 1. If the normalized host is in the allow-list, the full CORS header
//!    set is emitted, with `Access-Control-Allow-Origin` pointing at the
//!    normalized host over HTTPS.
//! 2. If the request path is a font asset, a wildcard
//!    `Access-Control-Allow-Origin` and the font's MIME type are emitted.
//!
//! When both fire, the write list contains `Access-Control-Allow-Origin`
//! twice, in that order. Application is last-write-wins, so the wildcard
//! is the effective value.

use axum::http::header::{
	HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS,
	ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
	ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE, VARY,
};

use crate::{fonts, origin};

/// `Access-Control-Allow-Private-Network`, which [`axum::http`] has no
/// constant for. Required by Chrome when a public site reaches into
/// private address space.
const ACCESS_CONTROL_ALLOW_PRIVATE_NETWORK: HeaderName =
	HeaderName::from_static("access-control-allow-private-network");

/// The outcome of a header policy decision.
///
/// Carries the disposition of both checks plus the header writes to
/// perform, in order. Decisions are recomputed from scratch for every
/// request; identical inputs produce identical decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsDecision {
	/// Whether the normalized request host matched the allow-list.
	origin_allowed: bool,

	/// The font extension the request path matched, if any.
	font: Option<fonts::FontExtension>,

	/// Header writes, in order. Later writes to the same header override
	/// earlier ones when applied.
	headers: Vec<(HeaderName, HeaderValue)>,
}

impl CorsDecision {
	/// Whether the normalized request host was found in the allow-list.
	pub fn origin_allowed(&self) -> bool {
		self.origin_allowed
	}

	/// The font extension the request path was classified as, if any.
	pub fn font(&self) -> Option<fonts::FontExtension> {
		self.font
	}

	/// Whether this decision emits any headers at all.
	pub fn is_empty(&self) -> bool {
		self.headers.is_empty()
	}

	/// The header writes this decision will perform, in order.
	pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
		&self.headers
	}

	/// Applies the decision to a set of response headers.
	///
	/// Writes are applied in order and later writes win, so a request
	/// that is both allow-listed and a font asset ends up with
	/// `Access-Control-Allow-Origin: *`.
	pub fn apply(&self, headers: &mut HeaderMap) {
		for (name, value) in &self.headers {
			headers.insert(name.clone(), value.clone());
		}
	}
}

/// Splits the raw allow-list value into individual origins.
///
/// One origin per line; surrounding whitespace is trimmed and empty lines
/// are dropped. Everything else is kept verbatim.
fn parse_allow_list(raw: &str) -> impl Iterator<Item = &str> {
	raw.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// Decides which headers to emit for a request.
///
/// `raw_host` is the host the request was addressed to, `request_uri` is
/// the path (and optional query string) that was requested, and
/// `allow_list_raw` is the current allow-list value.
///
/// There is no error case: an empty or garbage allow-list, or a host that
/// does not survive header encoding, degrades to an empty decision and no
/// headers are emitted.
pub fn decide(raw_host: &str, request_uri: &str, allow_list_raw: &str) -> CorsDecision {
	let origin = origin::normalize(raw_host);
	let mut decision = CorsDecision::default();

	if parse_allow_list(allow_list_raw).any(|allowed| allowed == origin) {
		if let Ok(allow_origin) = HeaderValue::try_from(format!("https://{origin}")) {
			decision.origin_allowed = true;
			decision.headers.extend([
				(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin),
				(VARY, HeaderValue::from_static("Origin")),
				(
					ACCESS_CONTROL_ALLOW_CREDENTIALS,
					HeaderValue::from_static("true"),
				),
				(
					ACCESS_CONTROL_ALLOW_METHODS,
					HeaderValue::from_static("GET, POST, OPTIONS"),
				),
				(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*")),
				(
					ACCESS_CONTROL_EXPOSE_HEADERS,
					HeaderValue::from_static("Content-Length, X-Knowledge-Base"),
				),
				// preflight cache
				(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400")),
				(
					ACCESS_CONTROL_ALLOW_PRIVATE_NETWORK,
					HeaderValue::from_static("true"),
				),
			]);
		}
	}

	if let Some(ext) = fonts::classify(request_uri) {
		decision.font = Some(ext);
		decision.headers.extend([
			(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
			(CONTENT_TYPE, HeaderValue::from_static(ext.content_type())),
		]);
	}

	decision
}

#[cfg(test)]
mod tests {
	use axum::http::header::{
		HeaderMap, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
		VARY,
	};

	use super::{decide, parse_allow_list, CorsDecision};
	use crate::fonts::FontExtension;

	fn header_values<'d>(decision: &'d CorsDecision, name: &str) -> Vec<&'d str> {
		decision
			.headers()
			.iter()
			.filter(|(header, _)| header.as_str() == name)
			.map(|(_, value)| value.to_str().expect("header values are ascii"))
			.collect()
	}

	#[test]
	fn parsing_trims_and_drops_blank_lines() {
		let parsed = parse_allow_list(" a \n\n b\n").collect::<Vec<_>>();

		assert_eq!(parsed, ["a", "b"]);
	}

	#[test]
	fn parsing_handles_crlf_line_endings() {
		let parsed = parse_allow_list("a.example\r\nb.example\r\n").collect::<Vec<_>>();

		assert_eq!(parsed, ["a.example", "b.example"]);
	}

	#[test]
	fn www_host_matches_bare_allow_list_entry() {
		let decision = decide("www.example.com", "/", "example.com\nfoo.bar");

		assert!(decision.origin_allowed());
		assert_eq!(
			header_values(&decision, "access-control-allow-origin"),
			["https://example.com"],
		);
		assert_eq!(header_values(&decision, "vary"), ["Origin"]);
	}

	#[test]
	fn allowed_origin_emits_each_header_exactly_once() {
		let decision = decide("example.com", "/", "example.com");

		assert_eq!(decision.headers().len(), 8);

		for expected in [
			"access-control-allow-origin",
			"vary",
			"access-control-allow-credentials",
			"access-control-allow-methods",
			"access-control-allow-headers",
			"access-control-expose-headers",
			"access-control-max-age",
			"access-control-allow-private-network",
		] {
			assert_eq!(
				header_values(&decision, expected).len(),
				1,
				"`{expected}` should be written exactly once",
			);
		}
	}

	#[test]
	fn unknown_host_is_denied() {
		let decision = decide("evil.example", "/", "example.com\nfoo.bar");

		assert!(!decision.origin_allowed());
		assert!(decision.is_empty());
	}

	#[test]
	fn empty_allow_list_never_matches() {
		let decision = decide("example.com", "/", "");

		assert!(!decision.origin_allowed());
		assert!(decision.is_empty());
	}

	#[test]
	fn matching_is_case_sensitive() {
		let decision = decide("Example.com", "/", "example.com");

		assert!(!decision.origin_allowed());
	}

	#[test]
	fn font_assets_get_wildcard_origin_and_mime_type() {
		let decision = decide("nobody.example", "/fonts/x.WOFF2?v=3", "");

		assert_eq!(decision.font(), Some(FontExtension::Woff2));
		assert_eq!(header_values(&decision, "access-control-allow-origin"), ["*"]);
		assert_eq!(
			header_values(&decision, "content-type"),
			["application/font-woff2"],
		);
	}

	#[test]
	fn both_checks_fire_independently_and_the_last_write_wins() {
		let decision = decide("www.example.com", "/fonts/a.ttf", "example.com");

		assert!(decision.origin_allowed());
		assert_eq!(decision.font(), Some(FontExtension::Ttf));

		// Both writes stay in the list, allow-list branch first.
		assert_eq!(
			header_values(&decision, "access-control-allow-origin"),
			["https://example.com", "*"],
		);

		let mut headers = HeaderMap::new();
		decision.apply(&mut headers);

		assert_eq!(
			headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok()),
			Some("*"),
		);
		assert_eq!(
			headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
			Some("application/font-ttf"),
		);
		assert!(headers.contains_key(VARY));
		assert!(headers.contains_key(ACCESS_CONTROL_ALLOW_CREDENTIALS));
	}

	#[test]
	fn decisions_are_idempotent() {
		let first = decide("www.example.com", "/fonts/a.woff", "example.com");
		let second = decide("www.example.com", "/fonts/a.woff", "example.com");

		assert_eq!(first, second);
	}
}
