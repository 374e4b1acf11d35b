//! Origin normalization.
//!
//! Hosts are compared against the allow-list in a canonical form: a single
//! leading `www.` label is stripped, so `www.example.com` and `example.com`
//! name the same origin. Nothing else is touched; matching stays
//! case-sensitive and ports are left alone.

/// Strips a leading `www.` from `raw_host`, if present.
///
/// The returned value is used both for allow-list matching and for the
/// emitted `Access-Control-Allow-Origin` value.
pub fn normalize(raw_host: &str) -> &str {
	raw_host.strip_prefix("www.").unwrap_or(raw_host)
}
