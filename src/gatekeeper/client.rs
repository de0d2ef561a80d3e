//! Convenience pairing of a gatekeeper with the transport it forwards to.

// self
use crate::{
	_prelude::*,
	gatekeeper::Gatekeeper,
	transport::{InboundResponse, OutboundRequest, Transport},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAuthorizedClient = AuthorizedClient<ReqwestTransport>;

/// Sends every request through a [`Gatekeeper`] before it reaches the transport.
pub struct AuthorizedClient<T>
where
	T: ?Sized + Transport,
{
	gatekeeper: Gatekeeper,
	transport: Arc<T>,
}
impl<T> AuthorizedClient<T>
where
	T: ?Sized + Transport,
{
	/// Pairs `gatekeeper` with `transport`.
	pub fn new(gatekeeper: Gatekeeper, transport: impl Into<Arc<T>>) -> Self {
		Self { gatekeeper, transport: transport.into() }
	}

	/// Returns the gatekeeper guarding this client.
	pub fn gatekeeper(&self) -> &Gatekeeper {
		&self.gatekeeper
	}

	/// Returns the underlying transport.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Sends `request` through the gatekeeper.
	pub async fn send(&self, request: OutboundRequest) -> Result<InboundResponse> {
		self.gatekeeper.handle(request, self.transport.as_ref()).await
	}
}
#[cfg(feature = "reqwest")]
impl AuthorizedClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn reqwest(gatekeeper: Gatekeeper) -> Self {
		Self::new(gatekeeper, ReqwestTransport::default())
	}
}
impl<T> Clone for AuthorizedClient<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self { gatekeeper: self.gatekeeper.clone(), transport: self.transport.clone() }
	}
}
impl<T> Debug for AuthorizedClient<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizedClient").field("gatekeeper", &self.gatekeeper).finish()
	}
}
