//! Transport contract used by the gatekeeper to forward requests.
//!
//! The gatekeeper never talks to the network itself. It hands a signed
//! [`OutboundRequest`] to a [`Transport`] and inspects the outcome: an [`InboundResponse`] for
//! success statuses, or an [`HttpFailure`] for everything else. Transports must report non-2xx
//! responses as failures so the gatekeeper can recognize a 401 and retry.

pub mod message;

pub use message::*;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<InboundResponse, HttpFailure>> + 'a + Send>>;

/// Capability to send a request and obtain a response or failure.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across tasks behind an
/// `Arc`, and the returned future must be `Send`.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request`, resolving to a response for success statuses and a failure otherwise.
	fn send(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] implementing [`Transport`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that aborts requests after `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn send(&self, request: OutboundRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let OutboundRequest { method, url, headers, body } = request;
			let response = client
				.request(method, url)
				.headers(headers)
				.body(body)
				.send()
				.await
				.map_err(HttpFailure::network)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(HttpFailure::network)?.to_vec();

			if status.is_success() {
				Ok(InboundResponse { status, headers, body })
			} else {
				Err(HttpFailure::from_response(status, &headers, &body))
			}
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[test]
	fn reqwest_transport_builds_with_timeout() {
		let transport = ReqwestTransport::with_timeout(std::time::Duration::from_secs(5))
			.expect("Reqwest client should build with a timeout.");
		let _: &ReqwestClient = transport.as_ref();
	}
}
