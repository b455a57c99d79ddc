// crates.io
use tracing::instrument::Instrumented;
// self
use crate::{_prelude::*, obs::Stage};

/// A span builder used by relay stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: Stage) -> Self {
		Self { span: tracing::info_span!("cashout_relay.stage", stage = stage.as_str()) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		tracing::Instrument::instrument(fut, self.span.clone())
	}
}
