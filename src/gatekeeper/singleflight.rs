// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	gatekeeper::Gatekeeper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::CompareAndSwapOutcome,
};

impl Gatekeeper {
	/// Obtains a token to replace `stale`, reusing a concurrent caller's result when possible.
	///
	/// The refreshed token is written with a compare-and-swap against `stale`. If the slot moved
	/// on in the meantime, the newer stored token wins as long as it is still usable; if the
	/// slot was cleared, the refreshed token serves this request only.
	pub(crate) async fn refresh_after(&self, stale: Option<&BearerToken>) -> Result<BearerToken> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_after");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = if self.config.coalesce_refreshes {
					let guard = self.refresh_guard.lock().await;

					if let Some(current) = self.rotated_since(stale).await? {
						obs::record_decision(KIND, "coalesced");
						self.refresh_metrics.record_coalesced();

						return Ok(current);
					}

					Some(guard)
				} else {
					None
				};

				self.refresh_metrics.record_attempt();

				let fresh = self.refresher.refresh().await.map_err(|err| {
					self.refresh_metrics.record_failure();

					Error::from(err)
				})?;

				self.refresh_metrics.record_success();

				let stored = match self.store.compare_and_swap(stale, fresh.clone()).await? {
					CompareAndSwapOutcome::Updated => fresh,
					CompareAndSwapOutcome::Mismatch => match self.store.fetch().await? {
						Some(existing) if self.is_usable(&existing) => existing,
						_ => fresh,
					},
					CompareAndSwapOutcome::Missing => {
						obs::record_decision(KIND, "slot_cleared");

						fresh
					},
				};

				Ok(stored)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Returns the stored token when another caller already replaced `stale` with a usable one.
	async fn rotated_since(&self, stale: Option<&BearerToken>) -> Result<Option<BearerToken>> {
		let current = self.store.fetch().await?;

		Ok(current.filter(|token| Some(token) != stale && self.is_usable(token)))
	}
}
