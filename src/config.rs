//! Module containing the [`Config`] struct, the service's configuration.

use std::env;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use derive_more::Debug;
use url::Url;

/// Configuration values for the service.
///
/// These are read from the environment on startup.
#[derive(Debug, Clone)]
pub struct Config {
	/// The ip address and port the service is going to listen on.
	#[debug("{addr}")]
	pub addr: SocketAddr,

	/// The public URL of the primary domain.
	///
	/// Its host is used as the request identity when a request does not
	/// carry a `Host` header.
	#[debug("{}", public_url.as_str())]
	pub public_url: Url,

	/// The initial allow-list value, one origin per line.
	///
	/// This only seeds the store; the live value is whatever was last
	/// written through the settings endpoint.
	pub allowed_origins: String,
}

impl Config {
	/// Creates a new [`Config`] object by reading from the environment.
	pub fn new() -> anyhow::Result<Self> {
		let ip_addr = parse_from_env("MULTIDOMAIN_IP")?;
		let port = parse_from_env("MULTIDOMAIN_PORT")?;
		let addr = SocketAddr::new(ip_addr, port);
		let public_url = parse_from_env("MULTIDOMAIN_PUBLIC_URL")?;
		let allowed_origins = env::var("MULTIDOMAIN_ALLOWED_ORIGINS").unwrap_or_default();

		Ok(Self {
			addr,
			public_url,
			allowed_origins,
		})
	}

	/// The host to attribute to requests that do not declare one.
	pub fn fallback_host(&self) -> &str {
		self.public_url.host_str().unwrap_or_default()
	}
}

/// Parses an environment variable into a `T`.
fn parse_from_env<T>(var: &str) -> anyhow::Result<T>
where
	T: FromStr,
	T::Err: StdError + Send + Sync + 'static,
{
	let value = env::var(var).with_context(|| format!("missing `{var}` environment variable"))?;

	if value.is_empty() {
		anyhow::bail!("`{var}` cannot be empty");
	}

	<T as FromStr>::from_str(&value).with_context(|| format!("failed to parse `{var}`"))
}
