//! Token refresher contract.
//!
//! The gatekeeper never knows how a new token is obtained. It calls
//! [`TokenRefresher::refresh`] and attaches whatever comes back; the exchange itself (a refresh
//! grant, a session cookie round-trip, a re-login) belongs to the implementation.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{_prelude::*, auth::BearerToken, error::BoxError};

/// Boxed future returned by [`TokenRefresher::refresh`].
pub type RefreshFuture<'a> =
	Pin<Box<dyn Future<Output = Result<BearerToken, RefreshError>> + 'a + Send>>;

/// Asynchronous exchange that yields a new bearer token.
pub trait TokenRefresher
where
	Self: Send + Sync,
{
	/// Obtains a fresh token. May suspend on I/O and may fail.
	fn refresh(&self) -> RefreshFuture<'_>;
}

/// Failure reported by a [`TokenRefresher`].
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct RefreshError {
	/// Human-readable reason.
	pub message: String,
	/// Underlying failure, when the refresher has one.
	#[source]
	pub source: Option<BoxError>,
}
impl RefreshError {
	/// Creates an error carrying only a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), source: None }
	}

	/// Creates an error wrapping an underlying failure.
	pub fn with_source(
		message: impl Into<String>,
		source: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self { message: message.into(), source: Some(Box::new(source)) }
	}
}

/// Adapts an async closure into a [`TokenRefresher`].
///
/// ```
/// use jwt_gatekeeper::{
/// 	auth::BearerToken,
/// 	refresh::{FnRefresher, RefreshError, TokenRefresher},
/// };
///
/// let refresher = FnRefresher::new(|| async {
/// 	Ok::<_, RefreshError>(BearerToken::new("header.payload.sig"))
/// });
/// let _: &dyn TokenRefresher = &refresher;
/// ```
pub struct FnRefresher<F>(F);
impl<F> FnRefresher<F> {
	/// Wraps `f`, which is invoked once per refresh.
	pub fn new(f: F) -> Self {
		Self(f)
	}
}
impl<F, Fut> TokenRefresher for FnRefresher<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<BearerToken, RefreshError>>,
{
	fn refresh(&self) -> RefreshFuture<'_> {
		Box::pin((self.0)())
	}
}
impl<F> Debug for FnRefresher<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnRefresher(..)")
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test]
	async fn fn_refresher_invokes_closure_per_call() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let refresher = FnRefresher::new(move || {
			let n = counter.fetch_add(1, Ordering::SeqCst);

			async move { Ok(BearerToken::new(format!("token-{n}"))) }
		});
		let first = refresher.refresh().await.expect("First refresh should succeed.");
		let second = refresher.refresh().await.expect("Second refresh should succeed.");

		assert_eq!(first.expose(), "token-0");
		assert_eq!(second.expose(), "token-1");
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn refresh_error_exposes_source() {
		let io = std::io::Error::other("socket closed");
		let err = RefreshError::with_source("refresh endpoint unreachable", io);

		assert_eq!(err.to_string(), "refresh endpoint unreachable");
		assert_eq!(
			StdError::source(&err).map(ToString::to_string),
			Some("socket closed".to_string())
		);
	}

	#[test]
	fn metrics_count_recorded_events() {
		let metrics = RefreshMetrics::default();

		metrics.record_attempt();
		metrics.record_failure();

		assert_eq!(metrics.attempts(), 1);
		assert_eq!(metrics.failures(), 1);
		assert_eq!(metrics.successes(), 0);
		assert_eq!(metrics.coalesced(), 0);
	}
}
