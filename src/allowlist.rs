//! The allow-list store.
//!
//! The store holds the raw, multi-line "allowed origins" value exactly as
//! the administrator entered it. Splitting it into individual origins
//! happens at decision time, so edits take effect on the next request.

use std::fmt::Debug;
use std::sync::RwLock;

/// Storage for the raw allow-list value.
///
/// Implementations hold one multi-line string, one origin per line.
/// Values are stored verbatim, with no validation; entries that are not
/// valid hosts simply never match anything.
pub trait AllowListStore: Debug + Send + Sync + 'static {
	/// Returns the raw allow-list value.
	///
	/// An empty string means nothing has been stored yet.
	fn get(&self) -> String;

	/// Replaces the stored value.
	fn set(&self, value: String);
}

/// An [`AllowListStore`] backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryAllowList {
	/// The raw value. Admin writes race with request reads; last write
	/// wins.
	value: RwLock<String>,
}

impl InMemoryAllowList {
	/// Creates a new store holding `value`.
	pub fn new(value: String) -> Self {
		Self {
			value: RwLock::new(value),
		}
	}
}

impl AllowListStore for InMemoryAllowList {
	fn get(&self) -> String {
		self.value
			.read()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}

	fn set(&self, value: String) {
		*self
			.value
			.write()
			.unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
	}
}
