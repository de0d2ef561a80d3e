//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	store::{CompareAndSwapOutcome, StoreError, StoreFuture, TokenStore},
};

type Slot = Arc<RwLock<Option<BearerToken>>>;

/// In-process token slot. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Creates a store pre-populated with `token`.
	pub fn with_token(token: impl Into<BearerToken>) -> Self {
		Self(Arc::new(RwLock::new(Some(token.into()))))
	}

	/// Returns the current token without going through the async contract.
	pub fn current(&self) -> Option<BearerToken> {
		self.0.read().clone()
	}

	fn cas_now(
		slot: Slot,
		expected: Option<&BearerToken>,
		replacement: BearerToken,
	) -> CompareAndSwapOutcome {
		let mut guard = slot.write();
		let outcome = match (guard.as_ref(), expected) {
			(None, None) => CompareAndSwapOutcome::Updated,
			(Some(current), Some(expected)) if current == expected =>
				CompareAndSwapOutcome::Updated,
			(Some(_), _) => CompareAndSwapOutcome::Mismatch,
			(None, Some(_)) => CompareAndSwapOutcome::Missing,
		};

		if matches!(outcome, CompareAndSwapOutcome::Updated) {
			*guard = Some(replacement);
		}

		outcome
	}
}
impl TokenStore for MemoryStore {
	fn fetch(&self) -> StoreFuture<'_, Option<BearerToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save(&self, token: BearerToken) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok::<_, StoreError>(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, Option<BearerToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.write().take()) })
	}

	fn compare_and_swap<'a>(
		&'a self,
		expected: Option<&'a BearerToken>,
		replacement: BearerToken,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(Self::cas_now(slot, expected, replacement)) })
	}
}
