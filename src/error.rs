//! Relay-level error types shared by the token provider, the payout relay, and the HTTP surface.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
///
/// Only [`Error::Validation`] is meant for the caller; every other variant is logged and reported
/// as a generic internal failure.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Inbound payout request is incomplete.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Credential exchange with the provider failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider response could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns true when the failure was caused by the caller's input.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::Validation(_))
	}
}

/// Inbound request validation failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// At least one of `receiverEmail`, `amount`, `currency` is missing or empty.
	#[error("Missing required fields")]
	MissingFields {
		/// Wire names of the fields that failed the presence check.
		fields: Vec<&'static str>,
	},
}

/// Failures raised while exchanging client credentials for an access token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the client credentials: {reason}.")]
	Rejected {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint answered with something other than an OAuth token document.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Description of the mismatch.
		message: String,
	},
	/// Token endpoint answered with a success status but an unusable body.
	#[error("Token endpoint returned an unusable response.")]
	MalformedResponse {
		/// Structured decoding failure.
		#[source]
		source: DecodeError,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Typed JSON decoding failure carrying the path of the offending field.
#[derive(Debug, ThisError)]
#[error("Failed to decode {target} at `{path}`.")]
pub struct DecodeError {
	/// Human label of the document being decoded.
	pub target: &'static str,
	/// JSON path of the failure.
	pub path: String,
	/// Underlying parse failure.
	#[source]
	pub source: serde_json::Error,
}
impl DecodeError {
	/// Builds a decode error from a path-aware parse failure.
	pub fn new(target: &'static str, err: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = err.path().to_string();

		Self { target, path, source: err.into_inner() }
	}

	/// Decodes `bytes` into `T`, labelling failures with `target`.
	pub fn decode<T>(target: &'static str, bytes: &[u8]) -> Result<T, Self>
	where
		T: serde::de::DeserializeOwned,
	{
		let de = &mut serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(de).map_err(|err| Self::new(target, err))
	}
}

/// Configuration and validation failures raised at startup or while building requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider base URL cannot be parsed or joined.
	#[error("Provider URL `{value}` is invalid.")]
	InvalidUrl {
		/// Offending value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Listen address cannot be parsed.
	#[error("Listen address `{value}` is invalid.")]
	InvalidListenAddr {
		/// Offending value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: std::net::AddrParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Which provider endpoint was being called.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// HTTP client failed in a way it could only describe as text.
	#[error("HTTP client error occurred while calling {endpoint}: {message}.")]
	Unexpected {
		/// Which provider endpoint was being called.
		endpoint: &'static str,
		/// Client-supplied description.
		message: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
