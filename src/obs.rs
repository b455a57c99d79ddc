//! Observability helpers for the relay stages.
//!
//! Every outbound call runs inside a `cashout_relay.stage` span carrying the `stage` field.
//! With the `metrics` feature enabled, the `cashout_relay_stage_total` counter is incremented for
//! every attempt, success, and failure, labeled by `stage` and `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Outbound stages performed for each payout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Client-credentials exchange against the token endpoint.
	TokenExchange,
	/// Batch payout submission.
	PayoutSubmission,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::TokenExchange => "token_exchange",
			Stage::PayoutSubmission => "payout_submission",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to the stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside the stage span and records attempt/success/failure around it.
pub async fn observe_stage<T, Fut>(stage: Stage, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = StageSpan::new(stage);

	record_stage_outcome(stage, StageOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_stage_outcome(stage, StageOutcome::Success),
		Err(_) => record_stage_outcome(stage, StageOutcome::Failure),
	}

	result
}
