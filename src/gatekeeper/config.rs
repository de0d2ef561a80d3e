//! Gatekeeper policies and the clock used for expiry checks.

// self
use crate::_prelude::*;

/// Source of the current instant for expiry checks.
///
/// Any `Fn() -> OffsetDateTime` closure is a clock, which keeps tests deterministic.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;
}
impl<F> Clock for F
where
	F: Send + Sync + Fn() -> OffsetDateTime,
{
	fn now(&self) -> OffsetDateTime {
		self()
	}
}

/// Wall-clock time in UTC.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// What to do with a stored token that cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedTokenPolicy {
	/// Fail the request with [`Error::Decode`].
	#[default]
	Reject,
	/// Forward the request without an `Authorization` header.
	TreatAsAbsent,
}

/// Tunables for [`Gatekeeper`](crate::gatekeeper::Gatekeeper).
///
/// Defaults: retry once on 401, coalesce concurrent refreshes, reject malformed tokens, no
/// expiry leeway, no bypassed paths. The struct deserializes from partial documents; missing
/// fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeeperConfig {
	/// Refresh and re-send once when the server answers 401.
	pub retry_on_unauthorized: bool,
	/// Share a single in-flight refresh between concurrent requests.
	pub coalesce_refreshes: bool,
	/// Handling of stored tokens that fail to decode.
	pub malformed_token_policy: MalformedTokenPolicy,
	/// Treat tokens as expired this long before their `exp` claim.
	pub expiry_leeway: Duration,
	/// URL path prefixes forwarded without any token handling (public pages, login, refresh).
	pub bypass_prefixes: Vec<String>,
}
impl GatekeeperConfig {
	/// Enables or disables the refresh-and-retry cycle on 401 responses.
	pub fn with_retry_on_unauthorized(mut self, enabled: bool) -> Self {
		self.retry_on_unauthorized = enabled;

		self
	}

	/// Enables or disables single-flight refresh coalescing.
	pub fn with_coalesced_refreshes(mut self, enabled: bool) -> Self {
		self.coalesce_refreshes = enabled;

		self
	}

	/// Overrides the malformed token policy.
	pub fn with_malformed_token_policy(mut self, policy: MalformedTokenPolicy) -> Self {
		self.malformed_token_policy = policy;

		self
	}

	/// Overrides the expiry leeway. Negative values are clamped to zero.
	pub fn with_expiry_leeway(mut self, leeway: Duration) -> Self {
		self.expiry_leeway = if leeway.is_negative() { Duration::ZERO } else { leeway };

		self
	}

	/// Adds a path prefix whose requests skip token handling.
	pub fn with_bypass_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.bypass_prefixes.push(prefix.into());

		self
	}

	/// Returns `true` when `url` matches a bypass prefix.
	pub fn bypasses(&self, url: &Url) -> bool {
		let path = url.path();

		self.bypass_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
	}
}
impl Default for GatekeeperConfig {
	fn default() -> Self {
		Self {
			retry_on_unauthorized: true,
			coalesce_refreshes: true,
			malformed_token_policy: MalformedTokenPolicy::default(),
			expiry_leeway: Duration::ZERO,
			bypass_prefixes: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn bypass_matches_path_prefixes_only() {
		let config = GatekeeperConfig::default()
			.with_bypass_prefix("/public/")
			.with_bypass_prefix("/auth/refresh");
		let public = Url::parse("https://api.example.com/public/logo.png")
			.expect("Public fixture URL should parse.");
		let refresh = Url::parse("https://api.example.com/auth/refresh?x=1")
			.expect("Refresh fixture URL should parse.");
		let private = Url::parse("https://public.example.com/reports")
			.expect("Private fixture URL should parse.");

		assert!(config.bypasses(&public));
		assert!(config.bypasses(&refresh));
		assert!(!config.bypasses(&private));
	}

	#[test]
	fn negative_leeway_is_clamped() {
		let config = GatekeeperConfig::default().with_expiry_leeway(Duration::seconds(-5));

		assert_eq!(config.expiry_leeway, Duration::ZERO);
	}

	#[test]
	fn partial_documents_keep_defaults() {
		let config: GatekeeperConfig = serde_json::from_str(
			r#"{"retry_on_unauthorized":false,"malformed_token_policy":"treat_as_absent"}"#,
		)
		.expect("Partial config should deserialize.");

		assert!(!config.retry_on_unauthorized);
		assert!(config.coalesce_refreshes);
		assert_eq!(config.malformed_token_policy, MalformedTokenPolicy::TreatAsAbsent);
		assert!(config.bypass_prefixes.is_empty());
	}

	#[test]
	fn closures_act_as_clocks() {
		let fixed = datetime!(2025-11-10 12:00 UTC);
		let clock = move || fixed;

		assert_eq!(Clock::now(&clock), fixed);
		assert!(SystemClock.now() > fixed - Duration::days(365 * 100));
	}
}
