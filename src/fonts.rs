//! Font asset classification.
//!
//! Requests for font files get their own header treatment so browsers will
//! load them from any domain the site is served as. Only the extensions
//! the service actively recognizes are listed here; `otf` and `eot` are
//! deliberately absent.

use derive_more::Display;

/// The font file extensions that receive cross-origin headers.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum FontExtension {
	/// `.woff` files.
	#[display("woff")]
	Woff,

	/// `.woff2` files.
	#[display("woff2")]
	Woff2,

	/// `.ttf` files.
	#[display("ttf")]
	Ttf,
}

impl FontExtension {
	/// The `Content-Type` value to emit for this extension.
	pub fn content_type(&self) -> &'static str {
		match self {
			Self::Woff => "application/font-woff",
			Self::Woff2 => "application/font-woff2",
			Self::Ttf => "application/font-ttf",
		}
	}
}

/// Extracts the lowercased file extension from a request URI.
///
/// The query string is ignored. Returns [`None`] if the path component
/// contains no `.`, or if nothing follows the last one.
pub fn extension(request_uri: &str) -> Option<String> {
	let path = request_uri
		.split_once('?')
		.map_or(request_uri, |(path, _query)| path);

	let (_, ext) = path.rsplit_once('.')?;

	if ext.is_empty() {
		return None;
	}

	Some(ext.to_lowercase())
}

/// Classifies a request URI as a font asset.
pub fn classify(request_uri: &str) -> Option<FontExtension> {
	match extension(request_uri)?.as_str() {
		"woff" => Some(FontExtension::Woff),
		"woff2" => Some(FontExtension::Woff2),
		"ttf" => Some(FontExtension::Ttf),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::{classify, extension, FontExtension};

	#[test]
	fn recognizes_fonts_regardless_of_path_casing() {
		assert_eq!(classify("/fonts/x.WOFF2"), Some(FontExtension::Woff2));
		assert_eq!(classify("/fonts/open-sans.woff"), Some(FontExtension::Woff));
		assert_eq!(classify("/Fonts/Open-Sans.TTF"), Some(FontExtension::Ttf));
	}

	#[test]
	fn ignores_the_query_string() {
		assert_eq!(classify("/fonts/x.woff?version=3"), Some(FontExtension::Woff));
		assert_eq!(extension("/page?file=x.woff"), None);
	}

	#[test]
	fn other_extensions_are_not_fonts() {
		assert_eq!(classify("/fonts/x.otf"), None);
		assert_eq!(classify("/fonts/x.eot"), None);
		assert_eq!(classify("/index.html"), None);
	}

	#[test]
	fn paths_without_extensions_are_not_fonts() {
		assert_eq!(extension("/fonts/x"), None);
		assert_eq!(extension("/trailing-dot."), None);
		assert_eq!(classify("/"), None);
	}

	#[test]
	fn content_types_follow_the_extension() {
		assert_eq!(FontExtension::Woff2.content_type(), "application/font-woff2");
		assert_eq!(FontExtension::Ttf.content_type(), "application/font-ttf");
	}
}
