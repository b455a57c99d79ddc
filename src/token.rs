//! Token provider: exchanges client credentials for a short-lived bearer credential.
//!
//! Nothing is cached. Every call to [`TokenProvider::fetch_access_token`] pays a full round trip to
//! the token endpoint.

// crates.io
use oauth2::{
	ClientId, ClientSecret as OAuthClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::RelayConfig,
	error::{AuthError, ConfigError, DecodeError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::{self, Stage},
};

const TOKEN_ENDPOINT: &str = "the token endpoint";

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed future returned by [`TokenProvider::fetch_access_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<AccessToken>> + 'a + Send>>;

/// Source of bearer credentials for the payout call.
///
/// The relay holds an `Arc<dyn TokenProvider>` so tests can substitute a stub for the network
/// exchange.
pub trait TokenProvider: Send + Sync {
	/// Obtains a fresh access token.
	fn fetch_access_token(&self) -> TokenFuture<'_>;
}

/// Client-credentials grant against the provider's token endpoint using HTTP Basic client
/// authentication.
pub struct ClientCredentialsProvider {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
}
impl ClientCredentialsProvider {
	/// Creates a provider from the relay configuration.
	pub fn new(config: &RelayConfig, http_client: ReqwestHttpClient) -> Self {
		let oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(OAuthClientSecret::new(config.client_secret.expose().to_owned()))
			.set_token_uri(TokenUrl::from_url(config.endpoints.token.clone()));

		Self { oauth_client, http_client }
	}

	async fn exchange(&self) -> Result<AccessToken> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		tracing::debug!("token endpoint issued an access token");

		Ok(AccessToken::new(response.access_token().secret().to_owned()))
	}
}
impl TokenProvider for ClientCredentialsProvider {
	fn fetch_access_token(&self) -> TokenFuture<'_> {
		Box::pin(obs::observe_stage(Stage::TokenExchange, self.exchange()))
	}
}
impl Debug for ClientCredentialsProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsProvider")
			.field("client_id", &self.oauth_client.client_id().as_str())
			.field("token_url", &self.oauth_client.token_uri().as_str())
			.finish()
	}
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) =>
			AuthError::Rejected { status, reason: describe_oauth_error(&response) }.into(),
		RequestTokenError::Request(error) => map_transport_error(error),
		RequestTokenError::Parse(_, _) | RequestTokenError::Other(_) if is_error_status(status) =>
			AuthError::Rejected { status, reason: "no OAuth error body".into() }.into(),
		RequestTokenError::Parse(source, _body) => AuthError::MalformedResponse {
			source: DecodeError::new("token response", source),
			status,
		}
		.into(),
		RequestTokenError::Other(message) =>
			AuthError::UnexpectedResponse { status, message }.into(),
	}
}

fn is_error_status(status: Option<u16>) -> bool {
	status.is_some_and(|code| !(200..300).contains(&code))
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) if inner.is_builder() => ConfigError::from(*inner).into(),
		HttpClientError::Reqwest(inner) => TransportError::network(TOKEN_ENDPOINT, *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::Unexpected { endpoint: TOKEN_ENDPOINT, message }.into(),
		_ => TransportError::Unexpected {
			endpoint: TOKEN_ENDPOINT,
			message: "unrecognized HTTP client failure".into(),
		}
		.into(),
	}
}

fn describe_oauth_error(response: &BasicErrorResponse) -> String {
	match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	}
}
