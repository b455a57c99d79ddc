mod common;

// crates.io
use httpmock::prelude::*;
// self
use cashout_relay::{
	config::RelayConfig,
	error::{AuthError, Error},
	http::ReqwestHttpClient,
	token::{ClientCredentialsProvider, TokenProvider},
};
use common::*;

fn provider_for(server: &MockServer) -> ClientCredentialsProvider {
	ClientCredentialsProvider::new(&config_for(server), ReqwestHttpClient::default())
}

#[tokio::test]
async fn exchange_presents_basic_credentials_and_returns_token() {
	let server = MockServer::start_async().await;
	let mock = mock_token_success(&server).await;
	let token = provider_for(&server)
		.fetch_access_token()
		.await
		.expect("Client-credentials exchange should succeed.");

	mock.assert_async().await;
	assert_eq!(token.expose(), ISSUED_TOKEN);
}

#[tokio::test]
async fn every_fetch_performs_a_new_exchange() {
	let server = MockServer::start_async().await;
	let mock = mock_token_success(&server).await;
	let provider = provider_for(&server);

	for _ in 0..2 {
		provider.fetch_access_token().await.expect("Exchange should succeed on every call.");
	}

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn invalid_client_is_reported_as_rejection() {
	let server = MockServer::start_async().await;
	let mock = mock_token_failure(
		&server,
		401,
		r#"{"error":"invalid_client","error_description":"Client Authentication failed"}"#,
	)
	.await;
	let err = provider_for(&server)
		.fetch_access_token()
		.await
		.expect_err("Rejected credentials should surface as an error.");

	mock.assert_async().await;

	match err {
		Error::Auth(AuthError::Rejected { status, reason }) => {
			assert_eq!(status, Some(401));
			assert!(reason.contains("invalid_client"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn success_without_access_token_is_malformed() {
	let server = MockServer::start_async().await;
	let mock = mock_token_failure(&server, 200, r#"{"token_type":"Bearer","expires_in":32400}"#)
		.await;
	let err = provider_for(&server)
		.fetch_access_token()
		.await
		.expect_err("Token document without access_token should be rejected.");

	mock.assert_async().await;
	assert!(matches!(err, Error::Auth(AuthError::MalformedResponse { status: Some(200), .. })));
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
	let server = MockServer::start_async().await;
	let mock = mock_token_failure(&server, 200, "<html>").await;
	let err = provider_for(&server)
		.fetch_access_token()
		.await
		.expect_err("Non-JSON token document should be rejected.");

	mock.assert_async().await;
	assert!(matches!(err, Error::Auth(AuthError::MalformedResponse { status: Some(200), .. })));
}

#[tokio::test]
async fn unreachable_token_endpoint_is_a_transport_failure() {
	let config = RelayConfig::new(CLIENT_ID, CLIENT_SECRET, "http://127.0.0.1:1")
		.expect("Loopback base URL should produce a valid config.");
	let provider = ClientCredentialsProvider::new(&config, ReqwestHttpClient::default());
	let err = provider
		.fetch_access_token()
		.await
		.expect_err("Closed port should fail to connect.");

	assert!(matches!(err, Error::Transport(_)));
}
