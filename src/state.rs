//! The service's shared application state.
//!
//! This is initialized once on startup, and then passed around the
//! application by axum.

use std::sync::Arc;

use crate::allowlist::{AllowListStore, InMemoryAllowList};
use crate::Config;

/// The main application state.
///
/// A reference-counted instance of this is shared with every handler and
/// middleware.
#[derive(Debug)]
pub struct State {
	/// The service configuration.
	pub config: Config,

	/// The allow-list store consulted on every request.
	allow_list: InMemoryAllowList,
}

impl State {
	/// Creates a new [`State`], seeding the allow-list store from the
	/// configuration.
	pub fn new(config: Config) -> Arc<Self> {
		let allow_list = InMemoryAllowList::new(config.allowed_origins.clone());

		Arc::new(Self { config, allow_list })
	}

	/// The allow-list store.
	pub fn allow_list(&self) -> &dyn AllowListStore {
		&self.allow_list
	}

	/// Creates a [`State`] for tests, listening nowhere in particular.
	#[cfg(test)]
	pub(crate) fn testing(allowed_origins: &str) -> Arc<Self> {
		Self::new(Config {
			addr: "127.0.0.1:0".parse().expect("valid socket addr"),
			public_url: "https://primary.example".parse().expect("valid url"),
			allowed_origins: allowed_origins.to_owned(),
		})
	}
}
