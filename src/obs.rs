//! Optional observability helpers for gatekeeper flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `jwt_gatekeeper.flow` with the `flow` and
//!   `stage` (call site) fields, plus debug events for refresh and retry decisions.
//! - Enable `metrics` to increment `jwt_gatekeeper_flow_total` (labeled by `flow` and
//!   `outcome`) for every stage, and `jwt_gatekeeper_decision_total` (labeled by `flow` and
//!   `decision`) for every branch taken.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Reports a gatekeeper decision such as `attach`, `expired`, or `coalesced` to every enabled
/// backend.
pub fn record_decision(kind: FlowKind, decision: &'static str) {
	trace_decision(kind, decision);
	count_decision(kind, decision);
}

/// Gatekeeper flow kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Signing and forwarding a request.
	Forward,
	/// Obtaining a new token from the refresher.
	Refresh,
	/// Re-sending a request after a 401.
	Retry,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Forward => "forward",
			FlowKind::Refresh => "refresh",
			FlowKind::Retry => "retry",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a gatekeeper stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
