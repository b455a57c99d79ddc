//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use httpmock::{Mock, prelude::*};
use tokio::net::TcpListener;
// self
use cashout_relay::{
	auth::AccessToken,
	config::RelayConfig,
	error::AuthError,
	payout::PayoutRelay,
	server,
	token::{TokenFuture, TokenProvider},
};

pub const CLIENT_ID: &str = "relay-client";
pub const CLIENT_SECRET: &str = "relay-secret";
pub const ISSUED_TOKEN: &str = "A21AAissued-bearer";
pub const TOKEN_PATH: &str = "/v1/oauth2/token";
pub const PAYOUTS_PATH: &str = "/v1/payments/payouts";

/// Relay configuration pointed at the mock provider.
pub fn config_for(server: &MockServer) -> RelayConfig {
	RelayConfig::new(CLIENT_ID, CLIENT_SECRET, &server.base_url())
		.expect("Mock provider base URL should produce a valid config.")
}

/// `Authorization` header value the token exchange must present.
pub fn basic_credentials() -> String {
	format!("Basic {}", STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}")))
}

/// Stubs a successful client-credentials exchange shaped like PayPal's answer.
pub async fn mock_token_success(server: &MockServer) -> Mock<'_> {
	let authorization = basic_credentials();

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", authorization)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"scope\":\"https://uri.paypal.com/services/payments/payouts\",\
				\"access_token\":\"{ISSUED_TOKEN}\",\"token_type\":\"Bearer\",\
				\"app_id\":\"APP-80W284485P519543T\",\"expires_in\":32400,\"nonce\":\"2024-nonce\"}}"
			));
		})
		.await
}

/// Stubs a token endpoint that answers with `status` and `body`.
pub async fn mock_token_failure<'a>(
	server: &'a MockServer,
	status: u16,
	body: &'static str,
) -> Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

/// Stubs the payout endpoint for requests bearing `token`.
pub async fn mock_payout<'a>(
	server: &'a MockServer,
	token: &str,
	status: u16,
	body: &'static str,
) -> Mock<'a> {
	let authorization = format!("Bearer {token}");

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(PAYOUTS_PATH)
				.header("authorization", authorization)
				.header("content-type", "application/json");
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

/// Serves `relay` on an ephemeral local port and returns its base URL.
pub async fn spawn_relay(relay: PayoutRelay) -> String {
	let listener =
		TcpListener::bind("127.0.0.1:0").await.expect("Ephemeral port should be bindable.");
	let addr = listener.local_addr().expect("Bound listener should expose its address.");

	tokio::spawn(async move {
		server::serve(listener, Arc::new(relay), std::future::pending())
			.await
			.expect("Relay server should keep serving.");
	});

	format!("http://{addr}")
}

/// Token provider that hands out a fixed token and counts calls.
#[derive(Debug)]
pub struct StaticTokenProvider {
	token: &'static str,
	calls: AtomicUsize,
}
impl StaticTokenProvider {
	pub fn new(token: &'static str) -> Arc<Self> {
		Arc::new(Self { token, calls: AtomicUsize::new(0) })
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenProvider for StaticTokenProvider {
	fn fetch_access_token(&self) -> TokenFuture<'_> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Ok(AccessToken::new(self.token)) })
	}
}

/// Token provider that always fails the way a rejected exchange does.
#[derive(Debug, Default)]
pub struct FailingTokenProvider;
impl TokenProvider for FailingTokenProvider {
	fn fetch_access_token(&self) -> TokenFuture<'_> {
		Box::pin(async {
			Err(AuthError::Rejected {
				status: Some(401),
				reason: "invalid_client: Client Authentication failed".into(),
			}
			.into())
		})
	}
}
