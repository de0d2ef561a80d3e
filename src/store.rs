//! Storage contract and the built-in in-memory slot for the current bearer token.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::BearerToken};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Single mutable slot holding the current bearer token.
///
/// Stores are injected into the gatekeeper as `Arc<dyn TokenStore>` so each session owns its
/// own slot. The gatekeeper only writes through
/// [`compare_and_swap`](TokenStore::compare_and_swap), which lets a slow refresh lose to a
/// newer token instead of overwriting it.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current token, if any.
	fn fetch(&self) -> StoreFuture<'_, Option<BearerToken>>;

	/// Replaces the current token unconditionally.
	fn save(&self, token: BearerToken) -> StoreFuture<'_, ()>;

	/// Empties the slot, returning the previous token.
	fn clear(&self) -> StoreFuture<'_, Option<BearerToken>>;

	/// Atomically replaces the token if the slot still holds `expected`.
	///
	/// `expected == None` matches an empty slot.
	fn compare_and_swap<'a>(
		&'a self,
		expected: Option<&'a BearerToken>,
		replacement: BearerToken,
	) -> StoreFuture<'a, CompareAndSwapOutcome>;
}

/// Result of a compare-and-swap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The slot held the expected token and now holds the replacement.
	Updated,
	/// The slot holds a different token than expected.
	Mismatch,
	/// A token was expected but the slot is empty.
	Missing,
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
