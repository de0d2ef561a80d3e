//! Structural JWT decoding for reading the `exp` claim of locally held tokens.
//!
//! # Security
//!
//! [`decode`] performs **no cryptographic verification**. The signature segment is never
//! inspected, so anyone can mint a token that decodes successfully with any claims they like.
//! Trusting the decoded expiry is only acceptable because the gatekeeper reads tokens that were
//! already issued to, and stored by, this client. Never use this module to authenticate tokens
//! received from another party; verification belongs to a separate capability.

// crates.io
use base64::{
	Engine, alphabet,
	engine::{
		DecodePaddingMode,
		general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD},
	},
};
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// JSON object type used for decoded headers and payloads.
pub type Claims = Map<String, Value>;

// Segments are read as leniently as browser `atob`: padding is optional and non-zero trailing
// bits in the final symbol are ignored.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
	.with_encode_padding(false)
	.with_decode_padding_mode(DecodePaddingMode::Indifferent)
	.with_decode_allow_trailing_bits(true);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Identifies which token segment failed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
	/// First segment (JOSE header).
	Header,
	/// Second segment (claims payload).
	Payload,
}
impl Segment {
	/// Returns a stable label suitable for error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Segment::Header => "header",
			Segment::Payload => "payload",
		}
	}
}
impl Display for Segment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failures raised while decoding a token or reading its expiry.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Token does not contain the header and payload segments.
	#[error("Token has {found} segment(s); at least 2 are required.")]
	MissingSegments {
		/// Number of dot-separated segments found.
		found: usize,
	},
	/// Segment is not valid base64.
	#[error("Token {segment} is not valid base64.")]
	Base64 {
		/// Offending segment.
		segment: Segment,
		/// Underlying base64 failure.
		#[source]
		source: base64::DecodeError,
	},
	/// Segment is not a JSON object.
	#[error("Token {segment} is not a JSON object.")]
	Json {
		/// Offending segment.
		segment: Segment,
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Segment contains bytes after the JSON object.
	#[error("Token {segment} has trailing data after the JSON object.")]
	TrailingData {
		/// Offending segment.
		segment: Segment,
		/// Underlying parser failure.
		#[source]
		source: serde_json::Error,
	},
	/// Payload lacks a usable numeric `exp` claim.
	#[error("Token payload has no usable numeric `exp` claim.")]
	InvalidExpiry,
}

/// Read-only view of a token's header and payload.
///
/// Computed on demand from a token string and never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedToken {
	/// Decoded JOSE header.
	pub header: Claims,
	/// Decoded claims payload.
	pub payload: Claims,
}
impl DecodedToken {
	/// Returns the raw `exp` claim in seconds since the Unix epoch.
	pub fn expiry_seconds(&self) -> Result<f64, DecodeError> {
		self.payload
			.get("exp")
			.and_then(Value::as_f64)
			.filter(|exp| exp.is_finite())
			.ok_or(DecodeError::InvalidExpiry)
	}

	/// Returns `exp * 1000`, truncated to whole milliseconds.
	pub fn expiry_millis(&self) -> Result<i128, DecodeError> {
		let millis = (self.expiry_seconds()? * 1_000.).trunc();

		if millis.abs() >= i64::MAX as f64 {
			return Err(DecodeError::InvalidExpiry);
		}

		Ok(millis as i128)
	}

	/// Returns the expiry instant.
	pub fn expires_at(&self) -> Result<OffsetDateTime, DecodeError> {
		OffsetDateTime::from_unix_timestamp_nanos(self.expiry_millis()? * 1_000_000)
			.map_err(|_| DecodeError::InvalidExpiry)
	}

	/// Returns `true` when the token expired strictly before `now`.
	///
	/// The comparison runs at millisecond granularity and treats an expiry equal to `now` as
	/// still valid. A positive `leeway` moves the expiry earlier so tokens are refreshed ahead
	/// of time.
	pub fn is_expired_at(
		&self,
		now: OffsetDateTime,
		leeway: Duration,
	) -> Result<bool, DecodeError> {
		let expiry = self.expiry_millis()? - leeway.whole_milliseconds();
		let now = now.unix_timestamp_nanos() / 1_000_000;

		Ok(expiry < now)
	}
}

/// Decodes the header and payload segments of `token`.
///
/// Both URL-safe and standard base64 alphabets are accepted, with or without padding. The
/// signature segment is ignored entirely; see the module docs.
pub fn decode(token: &str) -> Result<DecodedToken, DecodeError> {
	let mut parts = token.split('.');
	let (Some(header), Some(payload)) = (parts.next(), parts.next()) else {
		return Err(DecodeError::MissingSegments { found: token.split('.').count() });
	};

	Ok(DecodedToken {
		header: decode_segment(Segment::Header, header)?,
		payload: decode_segment(Segment::Payload, payload)?,
	})
}

/// Builds an unsigned three-segment token from the provided parts.
///
/// Header and payload are encoded as unpadded URL-safe base64. Intended for fixtures and local
/// tooling; the output carries whatever `signature` is supplied verbatim.
pub fn compose(header: &Claims, payload: &Claims, signature: &str) -> String {
	let header = Value::Object(header.clone()).to_string();
	let payload = Value::Object(payload.clone()).to_string();

	format!("{}.{}.{signature}", URL_SAFE_NO_PAD.encode(header), URL_SAFE_NO_PAD.encode(payload))
}

fn decode_segment(segment: Segment, raw: &str) -> Result<Claims, DecodeError> {
	let trimmed = raw.trim_end_matches('=');
	let engine = if trimmed.contains(['+', '/']) { &STANDARD_LENIENT } else { &URL_SAFE_LENIENT };
	let bytes = engine.decode(trimmed).map_err(|source| DecodeError::Base64 { segment, source })?;
	let mut de = serde_json::Deserializer::from_slice(&bytes);
	let claims = serde_path_to_error::deserialize::<_, Claims>(&mut de)
		.map_err(|source| DecodeError::Json { segment, source })?;

	de.end().map_err(|source| DecodeError::TrailingData { segment, source })?;

	Ok(claims)
}
