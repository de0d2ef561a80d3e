//! Request, response, and failure values exchanged with a [`Transport`](crate::transport::Transport).

// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, RETRY_AFTER},
};
use serde_json::Value;
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::{BoxError, ConfigError, TransportError},
};

/// Immutable description of an outbound HTTP request.
///
/// Builder methods consume `self` and return a new value; signing a request with
/// [`OutboundRequest::with_bearer`] clones it, so the caller's copy is never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Raw request body.
	pub body: Vec<u8>,
}
impl OutboundRequest {
	/// Creates a request with no headers and an empty body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// Sets (or overwrites) a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Replaces the body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Returns a copy carrying `Authorization: Bearer <token>`, replacing any existing value.
	///
	/// The header is flagged as sensitive so it is redacted from `Debug` output.
	pub fn with_bearer(&self, token: &BearerToken) -> Result<Self, ConfigError> {
		let mut value = HeaderValue::from_str(&token.bearer_value())?;

		value.set_sensitive(true);

		Ok(self.clone().with_header(AUTHORIZATION, value))
	}

	/// Returns the `Authorization` header, when present and valid UTF-8.
	pub fn authorization(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}
}

/// Successful response returned by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl InboundResponse {
	/// Creates a response with no headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Returns the body as UTF-8 text, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Raw failure reported by a transport before normalization.
///
/// Transports report any non-success status or network fault here; the gatekeeper decides
/// whether to retry and then calls [`HttpFailure::normalize`] to build the caller-facing error.
#[derive(Debug)]
pub struct HttpFailure {
	/// HTTP status, when a response was received.
	pub status: Option<StatusCode>,
	/// Status reason phrase or a short description of the network fault.
	pub status_text: String,
	/// Message embedded by the server in the error body, if any.
	pub message: Option<String>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Underlying transport failure.
	pub source: Option<BoxError>,
}
impl HttpFailure {
	/// Builds a failure from a non-success response.
	///
	/// The embedded message is read from a JSON body of the form `{"message": "..."}`.
	pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
		Self {
			status: Some(status),
			status_text: status.canonical_reason().unwrap_or("Unknown Status").to_owned(),
			message: embedded_message(body),
			retry_after: parse_retry_after(headers),
			source: None,
		}
	}

	/// Builds a failure for a request that never produced a response.
	pub fn network(source: impl 'static + Send + Sync + StdError) -> Self {
		Self {
			status: None,
			status_text: source.to_string(),
			message: None,
			retry_after: None,
			source: Some(Box::new(source)),
		}
	}

	/// Returns `true` for a 401 response.
	pub fn is_unauthorized(&self) -> bool {
		self.status == Some(StatusCode::UNAUTHORIZED)
	}

	/// Collapses the failure into a [`TransportError`] with a single human-readable message.
	///
	/// The server's embedded message wins; the status text is the fallback.
	pub fn normalize(self) -> TransportError {
		let message = self
			.message
			.filter(|message| !message.trim().is_empty())
			.unwrap_or(self.status_text);

		match self.status {
			Some(status) => TransportError::Status {
				message,
				status: status.as_u16(),
				retry_after: self.retry_after,
			},
			None => TransportError::Network { message, source: self.source },
		}
	}
}

fn embedded_message(body: &[u8]) -> Option<String> {
	let value = serde_json::from_slice::<Value>(body).ok()?;

	value.get("message")?.as_str().map(ToOwned::to_owned)
}

pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(secs.into()));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
