//! Request gatekeeper: attaches bearer tokens, refreshes expired ones, and retries once on 401.
//!
//! For every outbound request the gatekeeper reads the [`TokenStore`], decodes the stored token,
//! and compares `exp * 1000` against the clock in milliseconds. Valid tokens are attached as-is;
//! expired ones are exchanged through the [`TokenRefresher`] first and never sent. A 401 answer
//! triggers one more refresh and one more send; every other failure is normalized into
//! [`Error::Transport`].
//!
//! Concurrent refreshes are coalesced by default: callers queue on a per-gatekeeper async mutex
//! and, once inside, reuse any valid token another caller stored in the meantime. Disable it
//! with [`GatekeeperConfig::with_coalesced_refreshes`] to let each request refresh on its own.

pub mod client;
pub mod config;

mod handle;
mod singleflight;

pub use client::*;
pub use config::*;

// self
use crate::{
	_prelude::*,
	ext::{BearerSigner, RequestSigner},
	refresh::{RefreshMetrics, TokenRefresher},
	store::TokenStore,
};

/// Coordinates token attachment and refresh for outbound requests.
///
/// Cloning is cheap and clones share the store, refresher, metrics, and single-flight guard.
#[derive(Clone)]
pub struct Gatekeeper {
	/// Slot holding the current token.
	pub store: Arc<dyn TokenStore>,
	/// Exchange used to obtain a new token.
	pub refresher: Arc<dyn TokenRefresher>,
	/// Strategy that writes the token onto requests.
	pub signer: Arc<dyn RequestSigner>,
	/// Clock used for expiry checks.
	pub clock: Arc<dyn Clock>,
	/// Behavioral policies.
	pub config: GatekeeperConfig,
	/// Shared counters for refresher outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl Gatekeeper {
	/// Creates a gatekeeper with the default configuration, bearer signer, and system clock.
	pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
		Self {
			store,
			refresher,
			signer: Arc::new(BearerSigner),
			clock: Arc::new(SystemClock),
			config: GatekeeperConfig::default(),
			refresh_metrics: Default::default(),
			refresh_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Replaces the configuration.
	pub fn with_config(mut self, config: GatekeeperConfig) -> Self {
		self.config = config;

		self
	}

	/// Replaces the request signer.
	pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
		self.signer = signer;

		self
	}

	/// Replaces the clock used for expiry checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}
}
impl Debug for Gatekeeper {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gatekeeper")
			.field("config", &self.config)
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}
