//! Payout relay: validate, authenticate, submit one batch, map the provider's answer.

pub mod id;
pub mod model;

pub use id::*;
pub use model::*;

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::RelayConfig,
	error::{ConfigError, DecodeError, TransportError},
	http::ReqwestHttpClient,
	obs::{self, Stage},
	token::{ClientCredentialsProvider, TokenProvider},
};

const PAYOUT_ENDPOINT: &str = "the payout endpoint";

/// Relays one payout request to the provider's batch payout API.
///
/// Holds only read-only state; concurrent requests share the connection pool and nothing else.
#[derive(Clone)]
pub struct PayoutRelay {
	tokens: Arc<dyn TokenProvider>,
	http_client: ReqwestHttpClient,
	payouts_url: Url,
}
impl PayoutRelay {
	/// Creates a relay backed by the client-credentials token provider.
	pub fn new(config: &RelayConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::build()?;
		let tokens = Arc::new(ClientCredentialsProvider::new(config, http_client.clone()));

		Ok(Self::with_token_provider(config, tokens, http_client))
	}

	/// Creates a relay that reuses the caller-provided token provider and transport.
	pub fn with_token_provider(
		config: &RelayConfig,
		tokens: Arc<dyn TokenProvider>,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self { tokens, http_client, payouts_url: config.endpoints.payouts.clone() }
	}

	/// Validates `request`, obtains a fresh access token, and submits a one-item batch.
	///
	/// Validation runs before any network call. Provider answers with status >= 400 come back as
	/// [`PayoutResult::Rejected`]; everything else that goes wrong is an [`Error`].
	pub async fn submit_payout(&self, request: PayoutRequest) -> Result<PayoutResult> {
		let payout = request.validate()?;
		let token = self.tokens.fetch_access_token().await?;
		let batch = PayoutBatch::single(payout, PayoutIds::generate());

		obs::observe_stage(Stage::PayoutSubmission, self.submit_batch(&token, &batch)).await
	}

	async fn submit_batch(&self, token: &AccessToken, batch: &PayoutBatch) -> Result<PayoutResult> {
		let sender_batch_id = batch.sender_batch_header.sender_batch_id.as_str();

		tracing::debug!(sender_batch_id, "submitting payout batch");

		let response = self
			.http_client
			.post(self.payouts_url.clone())
			.bearer_auth(token.expose())
			.json(batch)
			.send()
			.await
			.map_err(map_reqwest_error)?;
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(map_reqwest_error)?;

		if status >= 400 {
			DecodeError::decode::<IgnoredAny>("payout error response", &body)?;

			tracing::warn!(status, sender_batch_id, "provider rejected payout batch");

			let body = String::from_utf8_lossy(&body).into_owned();

			return Ok(PayoutResult::Rejected { status, body });
		}

		let decoded: PayoutBatchResponse = DecodeError::decode("payout response", &body)?;
		let BatchHeader { payout_batch_id, batch_status } = decoded.batch_header;

		tracing::info!(
			sender_batch_id,
			payout_batch_id = %payout_batch_id,
			batch_status = batch_status.as_deref().unwrap_or("unknown"),
			"provider accepted payout batch"
		);

		Ok(PayoutResult::Accepted { payout_batch_id })
	}
}
impl Debug for PayoutRelay {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PayoutRelay").field("payouts_url", &self.payouts_url.as_str()).finish()
	}
}

fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		ConfigError::from(err).into()
	} else {
		TransportError::network(PAYOUT_ENDPOINT, err).into()
	}
}
