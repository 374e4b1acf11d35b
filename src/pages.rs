//! The content stand-in.
//!
//! The actual site lives behind this layer; this handler is the piece of
//! it the policy owns. Every domain serves the same document, and the
//! document declares a canonical URL for the domain it was requested on,
//! so search engines do not treat the mirrors as duplicates.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::Html;

/// Builds the canonical link tag for a page served as `host` at
/// `request_uri`.
///
/// The site is always addressed over HTTPS, whichever domain it was
/// reached through.
pub fn canonical_link_tag(host: &str, request_uri: &str) -> String {
	format!(r#"<link rel="canonical" href="https://{host}{request_uri}" />"#)
}

/// Serves the site content.
///
/// Mounted as the router fallback, so every path on every domain renders
/// the same document.
pub async fn serve(
	State(state): State<Arc<crate::State>>,
	headers: HeaderMap,
	uri: Uri,
) -> Html<String> {
	let host = headers
		.get(header::HOST)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_else(|| state.config.fallback_host());

	let request_uri = uri
		.path_and_query()
		.map_or("/", |path_and_query| path_and_query.as_str());

	let canonical = canonical_link_tag(host, request_uri);

	Html(format!(
		"<!doctype html>\n\
		 <html>\n\
		 <head>\n\
		 <meta charset=\"utf-8\" />\n\
		 {canonical}\n\
		 <title>Multi-Domain</title>\n\
		 </head>\n\
		 <body>\n\
		 <p>This site is reachable from every configured domain.</p>\n\
		 </body>\n\
		 </html>\n"
	))
}

#[cfg(test)]
mod tests {
	use super::canonical_link_tag;

	#[test]
	fn canonical_urls_are_always_https() {
		assert_eq!(
			canonical_link_tag("www.example.com", "/blog/post?page=2"),
			r#"<link rel="canonical" href="https://www.example.com/blog/post?page=2" />"#,
		);
	}
}
