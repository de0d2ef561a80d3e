//! Redacted bearer credential wrapper.

// self
use crate::{
	_prelude::*,
	auth::jwt::{self, DecodeError, DecodedToken},
};

/// Opaque bearer credential that keeps its value out of logs.
///
/// The wrapped string is expected to be a three-segment JWT, but nothing is validated on
/// construction; malformed values only surface when [`BearerToken::decode`] is called.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a new credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw credential. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Decodes the header and payload segments without verifying the signature.
	pub fn decode(&self) -> Result<DecodedToken, DecodeError> {
		jwt::decode(&self.0)
	}

	/// Renders the `Authorization` header value for this credential.
	pub fn bearer_value(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl From<String> for BearerToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for BearerToken {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl AsRef<str> for BearerToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
