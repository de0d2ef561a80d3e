//! Request signing contract that decides how a bearer token is attached to a request.

// self
use crate::{_prelude::*, auth::BearerToken, transport::OutboundRequest};

/// Describes how to attach a [`BearerToken`] to an outbound request.
///
/// Implementations must return a new request value and leave the input untouched.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Produces a copy of `request` carrying authorization state derived from `token`.
	fn sign(&self, request: &OutboundRequest, token: &BearerToken) -> Result<OutboundRequest>;
}

/// Default signer writing `Authorization: Bearer <token>`, replacing any prior value.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerSigner;
impl RequestSigner for BearerSigner {
	fn sign(&self, request: &OutboundRequest, token: &BearerToken) -> Result<OutboundRequest> {
		Ok(request.with_bearer(token)?)
	}
}
