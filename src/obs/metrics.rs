// self
use crate::obs::{FlowKind, FlowOutcome};

/// Increments `jwt_gatekeeper_flow_total{flow, outcome}` when the `metrics` feature is enabled.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"jwt_gatekeeper_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Increments `jwt_gatekeeper_decision_total{flow, decision}` when the `metrics` feature is
/// enabled.
pub fn count_decision(kind: FlowKind, decision: &'static str) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"jwt_gatekeeper_decision_total",
		"flow" => kind.as_str(),
		"decision" => decision
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, decision);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn counters_accept_every_label() {
		for kind in [FlowKind::Forward, FlowKind::Refresh, FlowKind::Retry] {
			for outcome in [FlowOutcome::Attempt, FlowOutcome::Success, FlowOutcome::Failure] {
				record_flow_outcome(kind, outcome);
			}

			count_decision(kind, "attach");
		}
	}
}
