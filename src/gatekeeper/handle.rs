// self
use crate::{
	_prelude::*,
	auth::{BearerToken, DecodeError},
	gatekeeper::{Gatekeeper, MalformedTokenPolicy},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::{HttpFailure, InboundResponse, OutboundRequest, Transport},
};

/// Token observed in the store and the token (if any) to present with the request.
struct Credential {
	observed: Option<BearerToken>,
	attach: Option<BearerToken>,
	/// `attach` was obtained from the refresher during this request.
	refreshed: bool,
}
impl Credential {
	fn stored(observed: Option<BearerToken>, attach: Option<BearerToken>) -> Self {
		Self { observed, attach, refreshed: false }
	}

	/// Token a 401 retry should treat as stale.
	fn rejected(self) -> Option<BearerToken> {
		self.attach.or(self.observed)
	}
}

impl Gatekeeper {
	/// Signs `request` with the current credential, forwards it through `transport`, and
	/// recovers from a 401 once.
	///
	/// - No stored token: the request is forwarded unchanged.
	/// - Valid token: forwarded with `Authorization: Bearer <token>`.
	/// - Expired token (`exp * 1000 < now` in milliseconds): the refresher runs first and the
	///   refreshed token is attached instead.
	/// - 401 response with retries enabled: the refresher runs and the original request is sent
	///   once more with the new token. The second outcome is final. A request that already
	///   carried a token refreshed by this call is not retried, so the refresher runs at most
	///   once per request.
	///
	/// Failures are normalized into [`Error::Transport`]; decode and refresh failures end the
	/// request without forwarding anything.
	pub async fn handle<T>(
		&self,
		request: OutboundRequest,
		transport: &T,
	) -> Result<InboundResponse>
	where
		T: ?Sized + Transport,
	{
		const KIND: FlowKind = FlowKind::Forward;

		let span = FlowSpan::new(KIND, "handle");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.handle_inner(request, transport)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Returns `true` when `token` decodes and is not expired under the current policy.
	pub fn is_usable(&self, token: &BearerToken) -> bool {
		matches!(self.is_expired(token), Ok(false))
	}

	pub(crate) fn is_expired(&self, token: &BearerToken) -> Result<bool, DecodeError> {
		token.decode()?.is_expired_at(self.clock.now(), self.config.expiry_leeway)
	}

	async fn handle_inner<T>(
		&self,
		request: OutboundRequest,
		transport: &T,
	) -> Result<InboundResponse>
	where
		T: ?Sized + Transport,
	{
		if self.config.bypasses(&request.url) {
			obs::record_decision(FlowKind::Forward, "bypass");

			return transport.send(request).await.map_err(normalize);
		}

		let credential = self.credential().await?;
		let outbound = match &credential.attach {
			Some(token) => self.signer.sign(&request, token)?,
			None => request.clone(),
		};

		match transport.send(outbound).await {
			Ok(response) => Ok(response),
			Err(failure)
				if failure.is_unauthorized()
					&& self.config.retry_on_unauthorized
					&& !credential.refreshed =>
				self.retry_unauthorized(request, credential.rejected(), transport).await,
			Err(failure) => Err(normalize(failure)),
		}
	}

	async fn credential(&self) -> Result<Credential> {
		let Some(token) = self.store.fetch().await? else {
			obs::record_decision(FlowKind::Forward, "no_token");

			return Ok(Credential::stored(None, None));
		};

		match self.is_expired(&token) {
			Ok(false) => {
				obs::record_decision(FlowKind::Forward, "attach");

				Ok(Credential::stored(Some(token.clone()), Some(token)))
			},
			Ok(true) => {
				obs::record_decision(FlowKind::Refresh, "expired");

				let fresh = self.refresh_after(Some(&token)).await?;

				Ok(Credential { observed: Some(token), attach: Some(fresh), refreshed: true })
			},
			Err(err) => match self.config.malformed_token_policy {
				MalformedTokenPolicy::Reject => Err(err.into()),
				MalformedTokenPolicy::TreatAsAbsent => {
					obs::record_decision(FlowKind::Forward, "malformed_ignored");

					Ok(Credential::stored(Some(token), None))
				},
			},
		}
	}

	async fn retry_unauthorized<T>(
		&self,
		request: OutboundRequest,
		rejected: Option<BearerToken>,
		transport: &T,
	) -> Result<InboundResponse>
	where
		T: ?Sized + Transport,
	{
		const KIND: FlowKind = FlowKind::Retry;

		let span = FlowSpan::new(KIND, "retry_unauthorized");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				obs::record_decision(KIND, "unauthorized");

				let fresh = self.refresh_after(rejected.as_ref()).await?;
				let signed = self.signer.sign(&request, &fresh)?;

				transport.send(signed).await.map_err(normalize)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

fn normalize(failure: HttpFailure) -> Error {
	failure.normalize().into()
}
